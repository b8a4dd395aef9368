//! Gradient rendering of dense scalar fields.

use crate::color::{FieldColorMap, LegendEntry};
use crate::facets::{FacetType, SpatialRegion};
use crate::raster::Canvas;

use super::{optional, Control, ControlError, ControlValue, FacetLayer, LayerBase, LayerError};

const MIN: &str = "min";
const MAX: &str = "max";
const LEGEND_BUCKETS: usize = 5;

/// Colors every pixel by the field value under it.
///
/// Fields coarser than one sample per world unit are drawn nearest-neighbour:
/// each pixel takes the sample whose square contains it.
#[derive(Debug)]
pub struct FieldFacetLayer {
    facet: FacetType,
    base: LayerBase,
    colors: FieldColorMap,
}

impl FieldFacetLayer {
    pub fn new(facet: FacetType, colors: FieldColorMap) -> Self {
        Self {
            facet,
            base: LayerBase::default(),
            colors,
        }
    }

    /// Black-to-white field layer over `[min, max]`.
    pub fn grayscale(facet: FacetType, min: f32, max: f32) -> Self {
        Self::new(facet, FieldColorMap::grayscale(min, max))
    }

    pub fn colors(&self) -> &FieldColorMap {
        &self.colors
    }

    /// Updates the mapped value range, notifying observers on change.
    pub fn set_range(&mut self, min: f32, max: f32) -> bool {
        let changed = self.colors.set_range(min, max);
        if changed {
            self.base.notify();
        }
        changed
    }

    pub fn set_colors(&mut self, colors: FieldColorMap) -> bool {
        self.base.update(&mut self.colors, colors)
    }
}

impl FacetLayer for FieldFacetLayer {
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
        let Some(grid) = optional(self.facet, region.field(self.facet))? else {
            return Ok(());
        };

        let bounds = region.bounds();
        for wy in bounds.min_y..bounds.max_y() {
            for wx in bounds.min_x..bounds.max_x() {
                if let Some(value) = grid.sample(wx, wy) {
                    canvas.put_pixel(wx, wy, self.colors.color_for(value));
                }
            }
        }
        Ok(())
    }

    fn describe(&self, region: &SpatialRegion, wx: i32, wy: i32) -> String {
        region
            .field(self.facet)
            .ok()
            .and_then(|grid| grid.sample(wx, wy))
            .map(|value| format!("{:.2}", value))
            .unwrap_or_default()
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            self.base.visible_control(),
            Control::new(MIN, "Minimum", self.colors.min()),
            Control::new(MAX, "Maximum", self.colors.max()),
        ]
    }

    fn set_control(&mut self, name: &str, value: ControlValue) -> Result<bool, ControlError> {
        match name {
            MIN => {
                let min = finite_number(name, value)?;
                let max = self.colors.max();
                Ok(self.set_range(min, max))
            }
            MAX => {
                let max = finite_number(name, value)?;
                let min = self.colors.min();
                Ok(self.set_range(min, max))
            }
            _ => self.base.set_base_control(name, value),
        }
    }

    fn legend(&self) -> Vec<LegendEntry<String>> {
        self.colors
            .legend(LEGEND_BUCKETS)
            .into_iter()
            .map(|e| LegendEntry::new(format!("{:.1}", e.key), e.color))
            .collect()
    }
}

fn finite_number(name: &str, value: ControlValue) -> Result<f32, ControlError> {
    let number = value.as_number().ok_or_else(|| ControlError::expects_number(name))?;
    if !number.is_finite() {
        return Err(ControlError::NotFinite { name: name.to_string() });
    }
    Ok(number)
}
