//! Ordered layer set and its persistable state.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::facets::FacetType;
use crate::layers::{ControlValue, FacetLayer, VISIBLE};

/// Persisted settings of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    /// Facet name; unknown names are skipped when the state is applied.
    pub facet: String,
    pub visible: bool,
    #[serde(default)]
    pub controls: BTreeMap<String, ControlValue>,
}

/// Persisted settings of a whole layer configuration, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerConfigState {
    pub layers: Vec<LayerState>,
}

impl LayerConfigState {
    /// Facets marked visible, in draw order.
    pub fn visible_facets(&self) -> Vec<&str> {
        self.layers
            .iter()
            .filter(|l| l.visible)
            .map(|l| l.facet.as_str())
            .collect()
    }
}

/// Layers keyed by facet type, at most one per facet, kept in draw order
/// (first drawn first).
#[derive(Default)]
pub struct LayerConfig {
    layers: Vec<Box<dyn FacetLayer>>,
}

impl LayerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, facet: FacetType) -> bool {
        self.position(facet).is_some()
    }

    /// Draw position of the layer for `facet`.
    pub fn position(&self, facet: FacetType) -> Option<usize> {
        self.layers.iter().position(|l| l.facet_type() == facet)
    }

    /// Inserts a layer. A layer replacing one for the same facet takes over
    /// its draw position; the replaced layer is returned.
    pub fn put(&mut self, layer: Box<dyn FacetLayer>) -> Option<Box<dyn FacetLayer>> {
        match self.position(layer.facet_type()) {
            Some(i) => Some(std::mem::replace(&mut self.layers[i], layer)),
            None => {
                self.layers.push(layer);
                None
            }
        }
    }

    pub fn get(&self, facet: FacetType) -> Option<&dyn FacetLayer> {
        self.layers
            .iter()
            .find(|l| l.facet_type() == facet)
            .map(|l| l.as_ref())
    }

    pub fn get_mut(&mut self, facet: FacetType) -> Option<&mut dyn FacetLayer> {
        self.layers
            .iter_mut()
            .find(|l| l.facet_type() == facet)
            .map(|l| l.as_mut() as &mut dyn FacetLayer)
    }

    pub fn remove(&mut self, facet: FacetType) -> Option<Box<dyn FacetLayer>> {
        let i = self.position(facet)?;
        Some(self.layers.remove(i))
    }

    /// Moves a layer to a new draw position, clamped to the end.
    pub fn move_to(&mut self, facet: FacetType, index: usize) -> bool {
        let Some(from) = self.position(facet) else {
            return false;
        };
        let to = index.min(self.layers.len() - 1);
        if from == to {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        true
    }

    /// All layers in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn FacetLayer> + '_ {
        self.layers.iter().map(|l| l.as_ref())
    }

    /// Visible layers in draw order.
    pub fn visible(&self) -> impl Iterator<Item = &dyn FacetLayer> + '_ {
        self.iter().filter(|l| l.is_visible())
    }

    pub fn facet_types(&self) -> Vec<FacetType> {
        self.layers.iter().map(|l| l.facet_type()).collect()
    }

    /// Snapshot of draw order, visibility and control values.
    pub fn state(&self) -> LayerConfigState {
        let layers = self
            .layers
            .iter()
            .map(|layer| LayerState {
                facet: layer.facet_type().name().to_string(),
                visible: layer.is_visible(),
                controls: layer
                    .controls()
                    .into_iter()
                    .filter(|c| c.name != VISIBLE)
                    .map(|c| (c.name.to_string(), c.value))
                    .collect(),
            })
            .collect();
        LayerConfigState { layers }
    }

    /// Restores a snapshot taken with [`state`](Self::state).
    ///
    /// Listed facets move to the front in listed order; layers the state does
    /// not mention keep their relative order behind them. Unknown facets and
    /// controls are skipped with a warning. Returns whether anything changed.
    pub fn apply_state(&mut self, state: &LayerConfigState) -> bool {
        let mut rank: HashMap<FacetType, usize> = HashMap::new();
        let mut known = Vec::with_capacity(state.layers.len());
        for entry in &state.layers {
            match entry.facet.parse::<FacetType>() {
                Ok(facet) => {
                    let next = rank.len();
                    rank.entry(facet).or_insert(next);
                    known.push((facet, entry));
                }
                Err(err) => warn!(error = %err, "skipping layer state"),
            }
        }

        let before = self.facet_types();
        self.layers
            .sort_by_key(|l| rank.get(&l.facet_type()).copied().unwrap_or(usize::MAX));
        let mut changed = before != self.facet_types();

        for (facet, entry) in known {
            let Some(layer) = self.get_mut(facet) else {
                warn!(facet = %facet, "no layer for saved state");
                continue;
            };
            changed |= layer.set_visible(entry.visible);
            for (name, value) in &entry.controls {
                match layer.set_control(name, *value) {
                    Ok(c) => changed |= c,
                    Err(err) => warn!(facet = %facet, error = %err, "skipping saved control"),
                }
            }
        }
        changed
    }
}

impl fmt::Debug for LayerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.facet_types()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{FieldFacetLayer, GraphFacetLayer, LayerRegistry};

    fn defaults() -> LayerConfig {
        LayerRegistry::with_defaults().build(&FacetType::all())
    }

    #[test]
    fn test_replace_keeps_draw_position() {
        let mut config = defaults();
        let old = config.put(Box::new(FieldFacetLayer::grayscale(FacetType::Temperature, 0.0, 1.0)));
        assert!(old.is_some());
        assert_eq!(config.position(FacetType::Temperature), Some(1));
        assert_eq!(config.len(), 5);
    }

    #[test]
    fn test_move_and_remove() {
        let mut config = defaults();
        assert!(config.move_to(FacetType::Graph, 0));
        assert!(!config.move_to(FacetType::Graph, 0));
        assert!(config.move_to(FacetType::Elevation, 99));
        assert_eq!(
            config.facet_types(),
            vec![
                FacetType::Graph,
                FacetType::Temperature,
                FacetType::Humidity,
                FacetType::Biome,
                FacetType::Elevation,
            ]
        );

        assert!(config.remove(FacetType::Humidity).is_some());
        assert!(config.remove(FacetType::Humidity).is_none());
        assert!(!config.move_to(FacetType::Humidity, 0));
    }

    #[test]
    fn test_visible_iteration() {
        let mut config = defaults();
        config.get_mut(FacetType::Biome).unwrap().set_visible(false);
        let visible: Vec<FacetType> = config.visible().map(|l| l.facet_type()).collect();
        assert_eq!(visible.len(), 4);
        assert!(!visible.contains(&FacetType::Biome));
    }

    #[test]
    fn test_state_json_round_trip() {
        let mut config = defaults();
        config.move_to(FacetType::Graph, 1);
        config.get_mut(FacetType::Humidity).unwrap().set_visible(false);
        config
            .get_mut(FacetType::Graph)
            .unwrap()
            .set_control("show_tris", ControlValue::Bool(true))
            .unwrap();

        let json = serde_json::to_string(&config.state()).unwrap();
        let state: LayerConfigState = serde_json::from_str(&json).unwrap();

        let mut restored = defaults();
        assert!(restored.apply_state(&state));
        assert_eq!(restored.facet_types(), config.facet_types());
        assert_eq!(restored.state(), config.state());
        assert!(!restored.get(FacetType::Humidity).unwrap().is_visible());
        assert!(!restored.apply_state(&state));
    }

    #[test]
    fn test_apply_partial_state() {
        let mut config = defaults();
        let state = LayerConfigState {
            layers: vec![
                LayerState {
                    facet: "graph".to_string(),
                    visible: false,
                    controls: BTreeMap::from([
                        ("show_sites".to_string(), ControlValue::Bool(false)),
                        ("opacity".to_string(), ControlValue::Number(0.5)),
                    ]),
                },
                LayerState {
                    facet: "rivers".to_string(),
                    visible: true,
                    controls: BTreeMap::new(),
                },
                LayerState {
                    facet: "humidity".to_string(),
                    visible: true,
                    controls: BTreeMap::new(),
                },
            ],
        };

        assert!(config.apply_state(&state));
        assert_eq!(
            config.facet_types(),
            vec![
                FacetType::Graph,
                FacetType::Humidity,
                FacetType::Elevation,
                FacetType::Temperature,
                FacetType::Biome,
            ]
        );
        assert!(!config.get(FacetType::Graph).unwrap().is_visible());
        assert_eq!(state.visible_facets(), vec!["rivers", "humidity"]);

        let mut graph_only = LayerConfig::new();
        graph_only.put(Box::new(GraphFacetLayer::default()));
        assert!(graph_only.apply_state(&state));
    }
}
