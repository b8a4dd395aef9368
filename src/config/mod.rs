//! Viewer configuration: the ordered layer set plus view and cache settings.
//!
//! Everything persistable round-trips through JSON strings; reading and
//! writing files is left to the caller.

mod layers;
mod view;

pub use layers::{LayerConfig, LayerConfigState, LayerState};
pub use view::{ViewConfig, ViewerConfig, MAX_TILE_SIZE};

use thiserror::Error;

use crate::facets::{FacetType, UnknownFacetType};

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown facet '{0}'")]
    UnknownFacet(String),
    #[error("Tile size {0} is outside 1..={max}", max = MAX_TILE_SIZE)]
    InvalidTileSize(u32),
}

impl From<UnknownFacetType> for ConfigError {
    fn from(err: UnknownFacetType) -> Self {
        ConfigError::UnknownFacet(err.0)
    }
}

/// Parses a list of facet names, failing on the first unknown one.
pub fn parse_facets<S: AsRef<str>>(names: &[S]) -> Result<Vec<FacetType>, ConfigError> {
    names
        .iter()
        .map(|n| n.as_ref().parse::<FacetType>().map_err(ConfigError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_facets() {
        assert_eq!(
            parse_facets(&["elevation", " Biome "]).unwrap(),
            vec![FacetType::Elevation, FacetType::Biome]
        );
        assert!(matches!(
            parse_facets(&["elevation", "rivers"]),
            Err(ConfigError::UnknownFacet(name)) if name == "rivers"
        ));
    }
}
