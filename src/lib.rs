//! Facet-layer rendering and composition for a 2D world viewer.
//!
//! A [`WorldGenerator`](generator::WorldGenerator) produces typed facets
//! (scalar fields, categorical grids, planar graphs) for rectangular
//! regions. Each [`FacetLayer`](layers::FacetLayer) turns one facet type into
//! pixels, and the [`Compositor`](viewer::Compositor) draws the visible layers
//! tile by tile, caching tiles until a layer change invalidates them.

pub mod color;
pub mod config;
pub mod export;
pub mod facets;
pub mod generator;
pub mod geometry;
pub mod layers;
pub mod noise;
pub mod raster;
pub mod viewer;

pub use color::{CategoricalColorMap, Color, FieldColorMap, IdentityColors};
pub use config::{LayerConfig, LayerConfigState, ViewConfig, ViewerConfig};
pub use facets::{Biome, FacetType, SpatialRegion, WorldFacet};
pub use generator::{NoiseWorldGenerator, WorldGenerator};
pub use geometry::{Graph, Rect2i};
pub use layers::{FacetLayer, LayerRegistry};
pub use viewer::{Compositor, TileState, ViewerError};
