//! Typed world data ("facets") and the spatial regions that carry them.
//!
//! A facet is one named slice of generated world data: a dense scalar grid,
//! a dense categorical grid, or a set of planar graphs. Facets are immutable
//! once produced and are looked up by [`FacetType`] in a [`SpatialRegion`].

mod biome;
mod grid;
mod region;

pub use biome::Biome;
pub use grid::{sample_window, Grid, GridError};
pub use region::{RegionError, SpatialRegion};

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Graph;

/// Stable identifier of a kind of world data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetType {
    /// Terrain height field.
    Elevation,
    /// Mean surface temperature field (°C).
    Temperature,
    /// Relative humidity field.
    Humidity,
    /// Biome classification grid.
    Biome,
    /// Planar cell graphs.
    Graph,
}

impl FacetType {
    pub const fn all() -> [FacetType; 5] {
        [
            FacetType::Elevation,
            FacetType::Temperature,
            FacetType::Humidity,
            FacetType::Biome,
            FacetType::Graph,
        ]
    }

    /// Stable lowercase name used in configuration and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            FacetType::Elevation => "elevation",
            FacetType::Temperature => "temperature",
            FacetType::Humidity => "humidity",
            FacetType::Biome => "biome",
            FacetType::Graph => "graph",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            FacetType::Elevation => "Elevation",
            FacetType::Temperature => "Temperature",
            FacetType::Humidity => "Humidity",
            FacetType::Biome => "Biomes",
            FacetType::Graph => "Graphs",
        }
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown facet name.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown facet type '{0}'")]
pub struct UnknownFacetType(pub String);

impl FromStr for FacetType {
    type Err = UnknownFacetType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacetType::all()
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFacetType(s.to_string()))
    }
}

/// Structural shape of a facet's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetShape {
    Field,
    Categorical,
    Graph,
}

impl fmt::Display for FacetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FacetShape::Field => "field",
            FacetShape::Categorical => "categorical",
            FacetShape::Graph => "graph",
        })
    }
}

/// Planar graphs overlapping a region. Graphs are shared, never copied.
#[derive(Debug, Clone, Default)]
pub struct GraphFacet {
    graphs: Vec<Arc<Graph>>,
}

impl GraphFacet {
    pub fn new(graphs: Vec<Arc<Graph>>) -> Self {
        Self { graphs }
    }

    pub fn graphs(&self) -> &[Arc<Graph>] {
        &self.graphs
    }

    /// First graph whose bounds contain the world point.
    pub fn graph_at(&self, x: i32, y: i32) -> Option<&Graph> {
        self.graphs
            .iter()
            .map(|g| g.as_ref())
            .find(|g| g.bounds().contains(x, y))
    }
}

/// One facet's data for a region.
#[derive(Debug, Clone)]
pub enum WorldFacet {
    Field(Grid<f32>),
    Biome(Grid<Biome>),
    Graph(GraphFacet),
}

impl WorldFacet {
    pub fn shape(&self) -> FacetShape {
        match self {
            WorldFacet::Field(_) => FacetShape::Field,
            WorldFacet::Biome(_) => FacetShape::Categorical,
            WorldFacet::Graph(_) => FacetShape::Graph,
        }
    }
}

/// Errors when a region cannot supply the facet a consumer asks for.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FacetError {
    #[error("Region has no '{0}' facet")]
    Missing(FacetType),
    #[error("Facet '{facet}' holds {found} data, expected {expected}")]
    Mismatch {
        facet: FacetType,
        expected: FacetShape,
        found: FacetShape,
    },
}

/// A value type stored in categorical grids.
pub trait Category: Copy + Eq + Hash + fmt::Display + Send + Sync + 'static {
    /// Extracts the grid of this category type from a facet, if it holds one.
    fn grid(facet: &WorldFacet) -> Option<&Grid<Self>>;
}

impl Category for Biome {
    fn grid(facet: &WorldFacet) -> Option<&Grid<Self>> {
        match facet {
            WorldFacet::Biome(grid) => Some(grid),
            _ => None,
        }
    }
}
