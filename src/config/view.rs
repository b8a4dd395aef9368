//! View and cache settings, and the combined persisted viewer configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ConfigError, LayerConfigState};
use crate::color::Color;

/// Largest accepted tile edge length.
pub const MAX_TILE_SIZE: u32 = 4096;

/// Settings of the compositor itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Tile edge length in world units (one world unit is one pixel).
    pub tile_size: u32,
    /// Color of pixels no layer paints.
    pub background: Color,
    /// Upper bound on cached tiles (at least one); least recently used tiles
    /// are evicted.
    pub max_cached_tiles: usize,
    /// Render missing tiles on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tile_size: 256,
            background: Color::BLACK,
            max_cached_tiles: 256,
            parallel: true,
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TILE_SIZE).contains(&self.tile_size) {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }
}

/// Everything the viewer persists between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub view: ViewConfig,
    /// Saved layer order, visibility and controls; `None` keeps the
    /// registry defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<LayerConfigState>,
}

impl ViewerConfig {
    /// Parses and validates a configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.view.validate()?;
        Ok(config)
    }

    /// Like [`from_json`](Self::from_json), but falls back to defaults on
    /// any error.
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|err| {
            warn!(error = %err, "invalid viewer configuration, using defaults");
            Self::default()
        })
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
