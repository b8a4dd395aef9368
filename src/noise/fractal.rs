//! Multi-octave fractal Brownian motion (fBm) noise over the world plane.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves.
    pub octaves: u8,
    /// Base frequency in cycles per world unit.
    pub frequency: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
    /// Random seed for reproducible generation.
    pub seed: i32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 5,
            frequency: 1.0 / 512.0,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 42,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Broad continents with moderately rough coastlines.
    pub fn continents(seed: i32) -> Self {
        Self {
            octaves: 6,
            frequency: 1.0 / 768.0,
            lacunarity: 2.1,
            persistence: 0.55,
            seed,
        }
    }

    /// Smoother, larger-scale variation for climate fields.
    pub fn climate(seed: i32) -> Self {
        Self {
            octaves: 4,
            frequency: 1.0 / 1024.0,
            lacunarity: 2.0,
            persistence: 0.45,
            seed,
        }
    }

    fn octave_seed(&self, octave: u8) -> i32 {
        self.seed.wrapping_add(octave as i32 * 31337)
    }
}

/// Samples a `width × height` lattice of points starting at `origin` and
/// spaced `step` world units apart, row-major.
///
/// Returns values in approximately [-1, 1] (normalized by amplitude sum).
/// A lattice point gets the same value from every window containing it as
/// long as `origin` is a multiple of `step`.
pub fn sample_fractal_grid(
    origin: Vec2,
    step: f32,
    width: usize,
    height: usize,
    config: &FractalNoiseConfig,
) -> Vec<f32> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut results = vec![0.0f32; width * height];
    let mut amplitude = 1.0f32;
    let mut frequency = config.frequency;
    let mut max_amplitude = 0.0f32;

    // Lattice index space: sample i sits at (origin / step + i) * step.
    let offset = origin / step;
    for octave in 0..config.octaves {
        let (values, _, _) = NoiseBuilder::fbm_2d_offset(offset.x, width, offset.y, height)
            .with_seed(config.octave_seed(octave))
            .with_freq(frequency * step)
            .with_octaves(1)
            .generate();

        for (acc, v) in results.iter_mut().zip(values) {
            *acc += v * amplitude;
        }

        max_amplitude += amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    if max_amplitude > 0.0 {
        for result in &mut results {
            *result /= max_amplitude;
        }
    }

    results
}
