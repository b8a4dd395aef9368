//! World generators: the source of facet data for the viewer.

mod lattice;
mod noise_world;

pub use lattice::{build_lattice_graph, LatticeOptions};
pub use noise_world::{GeneratorOptions, NoiseWorldGenerator};

use thiserror::Error;

use crate::facets::{FacetType, GridError, RegionError, SpatialRegion};
use crate::geometry::{GraphError, Rect2i};

/// Errors a generator can report while producing a region.
#[derive(Error, Debug, PartialEq)]
pub enum GeneratorError {
    #[error("Region assembly failed: {0}")]
    Region(#[from] RegionError),
    #[error("Grid construction failed: {0}")]
    Grid(#[from] GridError),
    #[error("Graph construction failed: {0}")]
    Graph(#[from] GraphError),
}

/// Produces facet data for arbitrary world rectangles.
///
/// `region` takes `&self` and may be called from several threads at once;
/// reseeding requires exclusive access.
pub trait WorldGenerator: Send + Sync {
    /// Facet types this generator provides, in preferred draw order.
    fn all_facets(&self) -> Vec<FacetType>;

    /// Generates every facet for `bounds`.
    fn region(&self, bounds: Rect2i) -> Result<SpatialRegion, GeneratorError>;

    fn seed(&self) -> &str;

    fn set_seed(&mut self, seed: &str);

    /// Derives internal state from the current seed. Must be called after
    /// [`set_seed`](Self::set_seed).
    fn initialize(&mut self);
}

/// Turns a user-facing seed string into a numeric seed.
///
/// Decimal strings map to their value; anything else is hashed (FNV-1a), so
/// the same string always yields the same world.
pub fn seed_from_str(seed: &str) -> u64 {
    let trimmed = seed.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return n;
    }
    trimmed.bytes().fold(0xcbf2_9ce4_8422_2325u64, |hash, b| {
        (hash ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
