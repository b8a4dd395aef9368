//! Spatial regions: a world rectangle plus the facet data clipped to it.

use std::collections::HashMap;

use thiserror::Error;

use super::{Category, FacetError, FacetShape, FacetType, GraphFacet, Grid, WorldFacet};
use crate::geometry::Rect2i;

/// Errors that can occur while assembling a region.
#[derive(Error, Debug, PartialEq)]
pub enum RegionError {
    #[error("Facet '{facet}' covers {grid:?}, region covers {region:?}")]
    Misaligned {
        facet: FacetType,
        grid: Rect2i,
        region: Rect2i,
    },
}

/// A rectangular window of world coordinates with its facet data.
///
/// Grid facets always cover exactly the region bounds. Graph facets list the
/// graphs overlapping the region, which may extend past it.
#[derive(Debug, Clone)]
pub struct SpatialRegion {
    bounds: Rect2i,
    facets: HashMap<FacetType, WorldFacet>,
}

impl SpatialRegion {
    /// Creates an empty region.
    pub fn new(bounds: Rect2i) -> Self {
        Self {
            bounds,
            facets: HashMap::new(),
        }
    }

    /// Adds a facet, rejecting grids that are not aligned to the region.
    pub fn insert(&mut self, facet_type: FacetType, facet: WorldFacet) -> Result<(), RegionError> {
        let grid_bounds = match &facet {
            WorldFacet::Field(grid) => Some(grid.bounds()),
            WorldFacet::Biome(grid) => Some(grid.bounds()),
            WorldFacet::Graph(_) => None,
        };
        if let Some(grid) = grid_bounds {
            if grid != self.bounds {
                return Err(RegionError::Misaligned {
                    facet: facet_type,
                    grid,
                    region: self.bounds,
                });
            }
        }
        self.facets.insert(facet_type, facet);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_facet(mut self, facet_type: FacetType, facet: WorldFacet) -> Result<Self, RegionError> {
        self.insert(facet_type, facet)?;
        Ok(self)
    }

    pub fn bounds(&self) -> Rect2i {
        self.bounds
    }

    pub fn facet(&self, facet_type: FacetType) -> Option<&WorldFacet> {
        self.facets.get(&facet_type)
    }

    pub fn has_facet(&self, facet_type: FacetType) -> bool {
        self.facets.contains_key(&facet_type)
    }

    pub fn facet_types(&self) -> impl Iterator<Item = FacetType> + '_ {
        self.facets.keys().copied()
    }

    /// Scalar grid for `facet_type`.
    pub fn field(&self, facet_type: FacetType) -> Result<&Grid<f32>, FacetError> {
        match self.require(facet_type)? {
            WorldFacet::Field(grid) => Ok(grid),
            other => Err(mismatch(facet_type, FacetShape::Field, other)),
        }
    }

    /// Categorical grid of `K` for `facet_type`.
    pub fn categories<K: Category>(&self, facet_type: FacetType) -> Result<&Grid<K>, FacetError> {
        let facet = self.require(facet_type)?;
        K::grid(facet).ok_or_else(|| mismatch(facet_type, FacetShape::Categorical, facet))
    }

    /// Graphs for `facet_type`.
    pub fn graphs(&self, facet_type: FacetType) -> Result<&GraphFacet, FacetError> {
        match self.require(facet_type)? {
            WorldFacet::Graph(graphs) => Ok(graphs),
            other => Err(mismatch(facet_type, FacetShape::Graph, other)),
        }
    }

    fn require(&self, facet_type: FacetType) -> Result<&WorldFacet, FacetError> {
        self.facets
            .get(&facet_type)
            .ok_or(FacetError::Missing(facet_type))
    }
}

fn mismatch(facet: FacetType, expected: FacetShape, found: &WorldFacet) -> FacetError {
    FacetError::Mismatch {
        facet,
        expected,
        found: found.shape(),
    }
}
