//! Viewer core: tile caching and composition of facet layers.

mod compositor;
mod tile;

pub use compositor::{Compositor, RenderStats};
pub use tile::{tile_bounds, tiles_in_range, tiles_overlapping, TileCache, TileState};

use thiserror::Error;

use crate::config::ConfigError;
use crate::facets::FacetType;
use crate::generator::GeneratorError;
use crate::geometry::Rect2i;
use crate::layers::ControlError;

/// Errors reported by the compositor.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Viewer has been disposed")]
    Disposed,
    #[error("Area {0:?} reaches past the representable world")]
    OutOfRange(Rect2i),
    #[error("No layer for facet '{0}'")]
    UnknownLayer(FacetType),
    #[error("Control error: {0}")]
    Control(#[from] ControlError),
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
