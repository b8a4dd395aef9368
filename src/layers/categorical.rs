//! Fixed-table rendering of categorical facets.

use crate::color::{CategoricalColorMap, Color, LegendEntry};
use crate::facets::{Biome, Category, FacetType, SpatialRegion};
use crate::raster::Canvas;

use super::{optional, FacetLayer, LayerBase, LayerError};

/// Biome preview palette. Unlisted categories render magenta.
pub fn biome_colors() -> CategoricalColorMap<Biome> {
    CategoricalColorMap::from_pairs(
        Biome::all().into_iter().map(|b| (b, Color::from_array(b.preview_rgb()))),
        Color::MAGENTA,
    )
}

/// Colors every pixel by the category under it.
#[derive(Debug)]
pub struct CategoricalFacetLayer<K: Category> {
    facet: FacetType,
    base: LayerBase,
    colors: CategoricalColorMap<K>,
}

impl<K: Category> CategoricalFacetLayer<K> {
    pub fn new(facet: FacetType, colors: CategoricalColorMap<K>) -> Self {
        Self {
            facet,
            base: LayerBase::default(),
            colors,
        }
    }

    pub fn colors(&self) -> &CategoricalColorMap<K> {
        &self.colors
    }

    pub fn set_colors(&mut self, colors: CategoricalColorMap<K>) -> bool {
        self.base.update(&mut self.colors, colors)
    }

    /// Recolors a single category, notifying observers on change.
    pub fn set_category_color(&mut self, key: K, color: Color) -> bool {
        if self.colors.contains(key) && self.colors.color_for(key) == color {
            return false;
        }
        self.colors.insert(key, color);
        self.base.notify();
        true
    }
}

impl CategoricalFacetLayer<Biome> {
    pub fn biomes(facet: FacetType) -> Self {
        Self::new(facet, biome_colors())
    }
}

impl<K: Category> FacetLayer for CategoricalFacetLayer<K> {
    fn facet_type(&self) -> FacetType {
        self.facet
    }

    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn render(&self, canvas: &mut Canvas<'_>, region: &SpatialRegion) -> Result<(), LayerError> {
        let Some(grid) = optional(self.facet, region.categories::<K>(self.facet))? else {
            return Ok(());
        };

        let bounds = region.bounds();
        for wy in bounds.min_y..bounds.max_y() {
            for wx in bounds.min_x..bounds.max_x() {
                if let Some(key) = grid.sample(wx, wy) {
                    canvas.put_pixel(wx, wy, self.colors.color_for(key));
                }
            }
        }
        Ok(())
    }

    fn describe(&self, region: &SpatialRegion, wx: i32, wy: i32) -> String {
        region
            .categories::<K>(self.facet)
            .ok()
            .and_then(|grid| grid.sample(wx, wy))
            .map(|key| key.to_string())
            .unwrap_or_default()
    }

    fn legend(&self) -> Vec<LegendEntry<String>> {
        self.colors
            .legend()
            .iter()
            .map(|e| LegendEntry::new(e.key.to_string(), e.color))
            .collect()
    }
}
