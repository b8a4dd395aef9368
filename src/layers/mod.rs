//! Facet layers: configurable visual encodings of one facet type each.
//!
//! Every layer implements [`FacetLayer`]. Shared state (visibility and the
//! observer list) lives in a [`LayerBase`] that each variant embeds; the
//! variants only supply their render strategy and their own controls.

mod observer;
mod control;
mod field;
mod categorical;
mod graph;
mod registry;

pub use observer::{Listener, ListenerId, ObserverList};
pub use control::{Control, ControlError, ControlValue};
pub use field::FieldFacetLayer;
pub use categorical::{biome_colors, CategoricalFacetLayer};
pub use graph::GraphFacetLayer;
pub use registry::{LayerFactory, LayerRegistry};

use thiserror::Error;
use tracing::debug;

use crate::color::LegendEntry;
use crate::facets::{FacetError, FacetShape, FacetType, SpatialRegion};
use crate::raster::Canvas;

/// Errors a layer can report while rendering a region.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerError {
    #[error("Region has no '{0}' facet")]
    MissingFacet(FacetType),
    #[error("Facet '{facet}' holds {found} data, layer expects {expected}")]
    FacetMismatch {
        facet: FacetType,
        expected: FacetShape,
        found: FacetShape,
    },
}

impl From<FacetError> for LayerError {
    fn from(err: FacetError) -> Self {
        match err {
            FacetError::Missing(facet) => LayerError::MissingFacet(facet),
            FacetError::Mismatch { facet, expected, found } => {
                LayerError::FacetMismatch { facet, expected, found }
            }
        }
    }
}

/// A configurable visual encoding of one facet type.
pub trait FacetLayer: Send + Sync {
    /// Facet this layer consumes.
    fn facet_type(&self) -> FacetType;

    /// Display name.
    fn name(&self) -> &str {
        self.facet_type().label()
    }

    fn base(&self) -> &LayerBase;

    fn base_mut(&mut self) -> &mut LayerBase;

    /// Paints the region's facet data onto `canvas`.
    ///
    /// The canvas is translated so that the region's minimum corner is pixel
    /// origin. A region without this layer's facet renders nothing.
    fn render(&self, canvas: &mut Canvas<'_>, region: &SpatialRegion) -> Result<(), LayerError>;

    /// Short description of a world coordinate, or an empty string when
    /// nothing addressable lies there.
    fn describe(&self, region: &SpatialRegion, wx: i32, wy: i32) -> String;

    fn controls(&self) -> Vec<Control> {
        vec![self.base().visible_control()]
    }

    /// Sets a control by name, returning whether its value changed.
    fn set_control(&mut self, name: &str, value: ControlValue) -> Result<bool, ControlError> {
        self.base_mut().set_base_control(name, value)
    }

    fn legend(&self) -> Vec<LegendEntry<String>> {
        Vec::new()
    }

    fn is_visible(&self) -> bool {
        self.base().is_visible()
    }

    fn set_visible(&mut self, visible: bool) -> bool {
        self.base_mut().set_visible(visible)
    }

    fn add_listener(&mut self, listener: Listener) -> ListenerId {
        self.base_mut().observers_mut().add(listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.base_mut().observers_mut().remove(id)
    }
}

pub(crate) const VISIBLE: &str = "visible";

/// Visibility and change notification shared by all layers.
#[derive(Debug)]
pub struct LayerBase {
    visible: bool,
    observers: ObserverList,
}

impl Default for LayerBase {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LayerBase {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            observers: ObserverList::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        self.observers.notify();
        true
    }

    pub fn observers(&self) -> &ObserverList {
        &self.observers
    }

    pub fn observers_mut(&mut self) -> &mut ObserverList {
        &mut self.observers
    }

    pub fn notify(&self) {
        self.observers.notify();
    }

    /// Stores `value` in `slot` and notifies observers, but only if it differs.
    pub fn update<T: PartialEq>(&self, slot: &mut T, value: T) -> bool {
        if *slot == value {
            return false;
        }
        *slot = value;
        self.observers.notify();
        true
    }

    pub fn visible_control(&self) -> Control {
        Control::new(VISIBLE, "Visible", self.visible)
    }

    /// Handles controls common to every layer.
    pub fn set_base_control(&mut self, name: &str, value: ControlValue) -> Result<bool, ControlError> {
        match name {
            VISIBLE => {
                let visible = value.as_bool().ok_or_else(|| ControlError::expects_bool(name))?;
                Ok(self.set_visible(visible))
            }
            _ => Err(ControlError::Unknown(name.to_string())),
        }
    }
}

/// Turns a missing facet into `Ok(None)` so the layer skips the region.
fn optional<T>(facet_type: FacetType, lookup: Result<T, FacetError>) -> Result<Option<T>, LayerError> {
    match lookup {
        Ok(value) => Ok(Some(value)),
        Err(FacetError::Missing(_)) => {
            debug!(facet = %facet_type, "region has no data for layer, skipping");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(base: &mut LayerBase) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        base.observers_mut().add(Arc::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        hits
    }

    #[test]
    fn test_visibility_notifies_only_on_change() {
        let mut base = LayerBase::new(true);
        let hits = counting(&mut base);

        assert!(!base.set_visible(true));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(base.set_visible(false));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!base.set_visible(false));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_update_helper() {
        let mut base = LayerBase::default();
        let hits = counting(&mut base);
        let mut threshold = 1.0f32;

        assert!(!base.update(&mut threshold, 1.0));
        assert!(base.update(&mut threshold, 2.0));
        assert_eq!(threshold, 2.0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_base_controls() {
        let mut base = LayerBase::default();
        assert_eq!(base.set_base_control("visible", ControlValue::Bool(false)), Ok(true));
        assert_eq!(
            base.set_base_control("visible", ControlValue::Number(1.0)),
            Err(ControlError::expects_bool("visible"))
        );
        assert_eq!(
            base.set_base_control("opacity", ControlValue::Number(1.0)),
            Err(ControlError::Unknown("opacity".to_string()))
        );
    }
}
