//! Planar noise used by the reference world generator.
//!
//! Uses simdnoise for SIMD-accelerated noise generation.

mod fractal;

pub use fractal::{sample_fractal_grid, FractalNoiseConfig};
