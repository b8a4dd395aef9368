//! Reference generator built from fractal noise and jittered lattices.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::{build_lattice_graph, seed_from_str, GeneratorError, LatticeOptions, WorldGenerator};
use crate::facets::{sample_window, Biome, FacetType, GraphFacet, Grid, SpatialRegion, WorldFacet};
use crate::geometry::Rect2i;
use crate::noise::{sample_fractal_grid, FractalNoiseConfig};

/// Tunables of [`NoiseWorldGenerator`].
///
/// Notes:
/// - Elevation and humidity are on a 0-100 scale.
/// - Temperatures are °C; latitude runs along the world y axis with the
///   equator at y = 0.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// World units per field sample.
    pub cell_size: u32,
    /// Edge length of the square each graph covers.
    pub graph_size: u32,
    pub lattice: LatticeOptions,

    /// Samples below this elevation are ocean.
    pub sea_level: f32,
    /// Samples at or above this elevation are mountains.
    pub mountain_level: f32,

    pub equator_temp_c: f32,
    pub pole_temp_c: f32,
    /// Distance from the equator at which pole temperature is reached.
    pub pole_distance: f32,
    /// Cooling per elevation unit above sea level (°C).
    pub lapse_rate: f32,
    /// Annual precipitation at humidity 100 (mm/year).
    pub max_precip_mm: f32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            cell_size: 4,
            graph_size: 256,
            lattice: LatticeOptions::default(),

            sea_level: 40.0,
            mountain_level: 85.0,

            equator_temp_c: 30.0,
            pole_temp_c: -25.0,
            pole_distance: 4096.0,
            lapse_rate: 0.35,
            max_precip_mm: 3000.0,
        }
    }
}

/// Seeded world generator providing every built-in facet type.
#[derive(Debug, Clone)]
pub struct NoiseWorldGenerator {
    seed: String,
    options: GeneratorOptions,
    elevation: FractalNoiseConfig,
    humidity: FractalNoiseConfig,
    graph_seed: u64,
}

impl NoiseWorldGenerator {
    /// Creates an initialized generator with default options.
    pub fn new(seed: &str) -> Self {
        Self::with_options(seed, GeneratorOptions::default())
    }

    pub fn with_options(seed: &str, options: GeneratorOptions) -> Self {
        let mut generator = Self {
            seed: seed.to_string(),
            options,
            elevation: FractalNoiseConfig::default(),
            humidity: FractalNoiseConfig::default(),
            graph_seed: 0,
        };
        generator.initialize();
        generator
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn to_unit_scale(noise: f32) -> f32 {
        ((noise * 0.5 + 0.5) * 100.0).clamp(0.0, 100.0)
    }

    fn temperature(&self, wy: f32, elevation: f32) -> f32 {
        let o = &self.options;
        let latitude = (wy.abs() / o.pole_distance.max(1.0)).min(1.0);
        let base = o.equator_temp_c + (o.pole_temp_c - o.equator_temp_c) * latitude;
        base - o.lapse_rate * (elevation - o.sea_level).max(0.0)
    }

    fn classify(&self, elevation: f32, temp_c: f32, humidity: f32) -> Biome {
        let o = &self.options;
        if elevation < o.sea_level {
            Biome::Ocean
        } else if elevation >= o.mountain_level {
            Biome::Mountain
        } else {
            Biome::classify_land(temp_c, humidity / 100.0 * o.max_precip_mm)
        }
    }

    fn graph_seed_for(&self, gx: i32, gy: i32) -> u64 {
        self.graph_seed
            ^ (gx as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (gy as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
    }

    /// Graphs whose squares overlap `bounds`.
    fn graphs(&self, bounds: Rect2i) -> Result<GraphFacet, GeneratorError> {
        if bounds.is_empty() {
            return Ok(GraphFacet::default());
        }
        let size = self.options.graph_size.max(1) as i32;
        let (gx0, gx1) = (bounds.min_x.div_euclid(size), (bounds.max_x() - 1).div_euclid(size));
        let (gy0, gy1) = (bounds.min_y.div_euclid(size), (bounds.max_y() - 1).div_euclid(size));

        let mut graphs = Vec::new();
        for gy in gy0..=gy1 {
            for gx in gx0..=gx1 {
                let area = Rect2i::new(gx * size, gy * size, size as u32, size as u32);
                let graph = build_lattice_graph(area, &self.options.lattice, self.graph_seed_for(gx, gy))?;
                graphs.push(Arc::new(graph));
            }
        }
        Ok(GraphFacet::new(graphs))
    }
}

impl WorldGenerator for NoiseWorldGenerator {
    fn all_facets(&self) -> Vec<FacetType> {
        FacetType::all().to_vec()
    }

    fn region(&self, bounds: Rect2i) -> Result<SpatialRegion, GeneratorError> {
        let cs = self.options.cell_size.max(1);
        // Samples sit on world multiples of the cell size so neighbouring
        // regions agree wherever they meet.
        let window = sample_window(bounds, cs);
        let (w, h) = (window.width as usize, window.height as usize);
        let origin = window.min().as_vec2() * cs as f32;

        let elevation: Vec<f32> = sample_fractal_grid(origin, cs as f32, w, h, &self.elevation)
            .into_iter()
            .map(Self::to_unit_scale)
            .collect();
        let humidity: Vec<f32> = sample_fractal_grid(origin, cs as f32, w, h, &self.humidity)
            .into_iter()
            .map(Self::to_unit_scale)
            .collect();

        let mut temperature = Vec::with_capacity(elevation.len());
        let mut biomes = Vec::with_capacity(elevation.len());
        for (i, (&e, &m)) in elevation.iter().zip(&humidity).enumerate() {
            let wy = (window.min_y as f32 + (i / w.max(1)) as f32) * cs as f32;
            let t = self.temperature(wy, e);
            temperature.push(t);
            biomes.push(self.classify(e, t, m));
        }

        let mut region = SpatialRegion::new(bounds);
        region.insert(FacetType::Elevation, WorldFacet::Field(Grid::new(bounds, cs, elevation)?))?;
        region.insert(FacetType::Temperature, WorldFacet::Field(Grid::new(bounds, cs, temperature)?))?;
        region.insert(FacetType::Humidity, WorldFacet::Field(Grid::new(bounds, cs, humidity)?))?;
        region.insert(FacetType::Biome, WorldFacet::Biome(Grid::new(bounds, cs, biomes)?))?;
        region.insert(FacetType::Graph, WorldFacet::Graph(self.graphs(bounds)?))?;
        Ok(region)
    }

    fn seed(&self) -> &str {
        &self.seed
    }

    fn set_seed(&mut self, seed: &str) {
        self.seed = seed.to_string();
    }

    fn initialize(&mut self) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed_from_str(&self.seed));
        self.elevation = FractalNoiseConfig::continents(rng.random::<i32>());
        self.humidity = FractalNoiseConfig::climate(rng.random::<i32>());
        self.graph_seed = rng.random::<u64>();
        debug!(seed = %self.seed, "generator initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_has_every_facet_at_native_resolution() {
        let generator = NoiseWorldGenerator::new("42");
        let bounds = Rect2i::new(-40, 10, 64, 30);
        let region = generator.region(bounds).unwrap();

        for facet in generator.all_facets() {
            assert!(region.has_facet(facet), "missing {}", facet);
        }
        let elevation = region.field(FacetType::Elevation).unwrap();
        assert_eq!(elevation.cell_size(), 4);
        assert_eq!(elevation.dims(), (16, 8));
        assert!(elevation.values().iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn test_neighbouring_regions_agree() {
        let generator = NoiseWorldGenerator::new("42");
        // Region edges at x = 10 and y = 6 are not multiples of the cell size.
        let whole = generator.region(Rect2i::new(0, 0, 20, 12)).unwrap();
        let left = generator.region(Rect2i::new(0, 0, 10, 6)).unwrap();
        let right = generator.region(Rect2i::new(10, 6, 10, 6)).unwrap();

        for facet in [FacetType::Elevation, FacetType::Temperature, FacetType::Humidity] {
            let whole = whole.field(facet).unwrap();
            for (part, area) in [(&left, Rect2i::new(0, 0, 10, 6)), (&right, Rect2i::new(10, 6, 10, 6))] {
                let part = part.field(facet).unwrap();
                for y in area.min_y..area.max_y() {
                    for x in area.min_x..area.max_x() {
                        assert_eq!(part.sample(x, y), whole.sample(x, y), "{} at ({}, {})", facet, x, y);
                    }
                }
            }
        }
    }

    #[test]
    fn test_biomes_follow_sea_level() {
        let generator = NoiseWorldGenerator::new("coast");
        let bounds = Rect2i::new(0, 0, 128, 128);
        let region = generator.region(bounds).unwrap();
        let elevation = region.field(FacetType::Elevation).unwrap();
        let biomes = region.categories::<Biome>(FacetType::Biome).unwrap();

        for (e, b) in elevation.values().iter().zip(biomes.values()) {
            assert_eq!(*e < 40.0, *b == Biome::Ocean);
        }
    }

    #[test]
    fn test_temperature_drops_towards_poles() {
        let generator = NoiseWorldGenerator::new("1");
        assert!(generator.temperature(0.0, 40.0) > generator.temperature(3000.0, 40.0));
        assert_eq!(generator.temperature(-5000.0, 40.0), generator.temperature(5000.0, 40.0));
        assert!(generator.temperature(0.0, 80.0) < generator.temperature(0.0, 40.0));
    }

    #[test]
    fn test_graphs_cover_overlapping_squares() {
        let generator = NoiseWorldGenerator::new("7");
        let region = generator.region(Rect2i::new(200, -20, 100, 40)).unwrap();
        let graphs = region.graphs(FacetType::Graph).unwrap();
        assert_eq!(graphs.graphs().len(), 4);
        assert_eq!(graphs.graph_at(210, -10).unwrap().bounds(), Rect2i::new(0, -256, 256, 256));
        assert_eq!(graphs.graph_at(260, 5).unwrap().bounds(), Rect2i::new(256, 0, 256, 256));
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let bounds = Rect2i::new(512, 512, 32, 32);
        let a = NoiseWorldGenerator::new("same").region(bounds).unwrap();
        let b = NoiseWorldGenerator::new("same").region(bounds).unwrap();
        assert_eq!(
            a.field(FacetType::Elevation).unwrap(),
            b.field(FacetType::Elevation).unwrap()
        );
        assert_eq!(
            a.graphs(FacetType::Graph).unwrap().graphs()[0],
            b.graphs(FacetType::Graph).unwrap().graphs()[0]
        );
    }

    #[test]
    fn test_reseed_changes_graphs() {
        let bounds = Rect2i::new(0, 0, 16, 16);
        let mut generator = NoiseWorldGenerator::new("a");
        let before = generator.region(bounds).unwrap();

        generator.set_seed("b");
        generator.initialize();
        assert_eq!(generator.seed(), "b");
        let after = generator.region(bounds).unwrap();
        assert_ne!(
            before.graphs(FacetType::Graph).unwrap().graphs()[0],
            after.graphs(FacetType::Graph).unwrap().graphs()[0]
        );
    }
}
