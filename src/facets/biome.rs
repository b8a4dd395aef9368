//! Biome categories for categorical facets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whittaker-style biome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Ocean,
    IceCap,
    Tundra,
    BorealForest,
    TemperateGrassland,
    TemperateDeciduousForest,
    TemperateRainforest,
    SubtropicalDesert,
    Savanna,
    TropicalSeasonalForest,
    TropicalRainforest,
    Mountain,
}

impl Biome {
    pub const fn all() -> [Biome; 12] {
        [
            Biome::Ocean,
            Biome::IceCap,
            Biome::Tundra,
            Biome::BorealForest,
            Biome::TemperateGrassland,
            Biome::TemperateDeciduousForest,
            Biome::TemperateRainforest,
            Biome::SubtropicalDesert,
            Biome::Savanna,
            Biome::TropicalSeasonalForest,
            Biome::TropicalRainforest,
            Biome::Mountain,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::IceCap => "Ice Cap",
            Biome::Tundra => "Tundra",
            Biome::BorealForest => "Boreal Forest",
            Biome::TemperateGrassland => "Temperate Grassland",
            Biome::TemperateDeciduousForest => "Temperate Deciduous Forest",
            Biome::TemperateRainforest => "Temperate Rainforest",
            Biome::SubtropicalDesert => "Subtropical Desert",
            Biome::Savanna => "Savanna",
            Biome::TropicalSeasonalForest => "Tropical Seasonal Forest",
            Biome::TropicalRainforest => "Tropical Rainforest",
            Biome::Mountain => "Mountain",
        }
    }

    /// RGB preview color.
    pub const fn preview_rgb(self) -> [u8; 3] {
        match self {
            Biome::Ocean => [15, 40, 90],
            Biome::IceCap => [240, 248, 255],
            Biome::Tundra => [170, 190, 170],
            Biome::BorealForest => [30, 80, 40],
            Biome::TemperateGrassland => [130, 180, 90],
            Biome::TemperateDeciduousForest => [40, 120, 60],
            Biome::TemperateRainforest => [20, 100, 60],
            Biome::SubtropicalDesert => [220, 205, 140],
            Biome::Savanna => [190, 190, 95],
            Biome::TropicalSeasonalForest => [50, 150, 70],
            Biome::TropicalRainforest => [20, 140, 55],
            Biome::Mountain => [140, 140, 140],
        }
    }

    /// Classifies a land sample from its mean temperature (°C) and annual
    /// precipitation (mm).
    pub fn classify_land(temp_c: f32, precip_mm: f32) -> Biome {
        if temp_c <= -10.0 {
            return Biome::IceCap;
        }

        if temp_c < 0.0 {
            if precip_mm < 350.0 {
                return Biome::Tundra;
            }
            return Biome::BorealForest;
        }

        if temp_c >= 20.0 {
            return match precip_mm {
                p if p >= 2500.0 => Biome::TropicalRainforest,
                p if p >= 1200.0 => Biome::TropicalSeasonalForest,
                p if p >= 450.0 => Biome::Savanna,
                _ => Biome::SubtropicalDesert,
            };
        }

        match precip_mm {
            p if p >= 1600.0 => Biome::TemperateRainforest,
            p if p >= 800.0 => Biome::TemperateDeciduousForest,
            p if p >= 350.0 => Biome::TemperateGrassland,
            _ => Biome::SubtropicalDesert,
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
