//! Identity-derived colors for diagnostic overlays.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{hsv_to_rgb, Color};

/// Assigns each identity a reproducible, visually distinct color.
///
/// The same `(seed, id)` pair always yields the same color. Colors are only
/// meaningful within one session; nothing about them is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityColors {
    seed: u64,
}

impl IdentityColors {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn color_for(&self, id: u64) -> Color {
        let mixed = self.seed ^ id.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut rng = ChaCha8Rng::seed_from_u64(mixed);

        let hue = rng.random::<f32>();
        let saturation = 0.5 + rng.random::<f32>() * 0.4;
        let value = 0.6 + rng.random::<f32>() * 0.3;
        hsv_to_rgb(hue, saturation, value)
    }

    /// Convenience for identities made of two indices.
    pub fn color_for_pair(&self, a: usize, b: usize) -> Color {
        self.color_for(((a as u64) << 32) ^ b as u64)
    }
}
