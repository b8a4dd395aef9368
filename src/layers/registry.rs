//! Startup table mapping facet types to layer constructors.

use std::collections::HashMap;

use tracing::debug;

use crate::color::{Color, FieldColorMap};
use crate::config::LayerConfig;
use crate::facets::FacetType;

use super::{CategoricalFacetLayer, FacetLayer, FieldFacetLayer, GraphFacetLayer};

/// Builds a fresh layer for a facet type.
pub type LayerFactory = Box<dyn Fn(FacetType) -> Box<dyn FacetLayer> + Send + Sync>;

/// Explicit facet-to-layer table, consulted when a generator's facets are
/// turned into a layer configuration.
#[derive(Default)]
pub struct LayerRegistry {
    factories: HashMap<FacetType, LayerFactory>,
}

impl LayerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a layer for every built-in facet type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FacetType::Elevation, |facet| {
            Box::new(FieldFacetLayer::new(facet, FieldColorMap::terrain(0.0, 100.0)))
        });
        registry.register(FacetType::Temperature, |facet| {
            Box::new(FieldFacetLayer::new(facet, FieldColorMap::thermal(-20.0, 40.0)))
        });
        registry.register(FacetType::Humidity, |facet| {
            Box::new(FieldFacetLayer::new(
                facet,
                FieldColorMap::new(0.0, 100.0, Color::WHITE, Color::BLUE),
            ))
        });
        registry.register(FacetType::Biome, |facet| {
            Box::new(CategoricalFacetLayer::biomes(facet))
        });
        registry.register(FacetType::Graph, |facet| Box::new(GraphFacetLayer::new(facet)));
        registry
    }

    /// Registers a constructor, replacing any previous one for the facet.
    pub fn register<F>(&mut self, facet: FacetType, factory: F) -> &mut Self
    where
        F: Fn(FacetType) -> Box<dyn FacetLayer> + Send + Sync + 'static,
    {
        self.factories.insert(facet, Box::new(factory));
        self
    }

    pub fn contains(&self, facet: FacetType) -> bool {
        self.factories.contains_key(&facet)
    }

    /// Creates one layer, if the facet is registered.
    pub fn create(&self, facet: FacetType) -> Option<Box<dyn FacetLayer>> {
        self.factories.get(&facet).map(|factory| factory(facet))
    }

    /// Creates layers for `facets` in order. Unregistered facets are skipped.
    pub fn build(&self, facets: &[FacetType]) -> LayerConfig {
        let mut config = LayerConfig::new();
        for &facet in facets {
            match self.create(facet) {
                Some(layer) => {
                    config.put(layer);
                }
                None => debug!(facet = %facet, "no layer registered for facet"),
            }
        }
        config
    }
}
