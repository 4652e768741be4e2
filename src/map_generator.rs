use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::agent::{City, IdAllocator};
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::height_grid::{CutMode, HeightGrid};
use crate::influence::build_influence_grid;
use crate::noise_field::NoiseField;
use crate::steering::{relax, Bounds};
use crate::tiled_map::TiledMap;

/// Influence above which a cell counts as city ground and loses its forest.
pub const CITY_CLEARING_THRESHOLD: f64 = 0.1;

/// Inner radius of every city relative to its outer radius.
const INNER_RADIUS_RATIO: f64 = 0.5;

/// How far the last call to [`MapGenerator::generate`] got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Init,
    NoiseGenerated,
    CitiesPlaced,
    FieldsComposed,
    Classified,
}

/// Builds tiled maps from a [`GenerationConfig`].
///
/// All randomness (noise lattices and city placement) is drawn from the
/// generator's own RNG, so two generators created with the same seed produce
/// identical maps for the same config.
pub struct MapGenerator<R: Rng = ChaCha8Rng> {
    rng: R,
    stage: GenerationStage,
}

impl MapGenerator<ChaCha8Rng> {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> MapGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        MapGenerator {
            rng,
            stage: GenerationStage::Init,
        }
    }

    /// `Init` before the first run, `Classified` after a successful one. A
    /// failed run stays at the last stage it completed.
    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    fn advance(&mut self, stage: GenerationStage) {
        debug!(from = ?self.stage, to = ?stage, "generation stage");
        self.stage = stage;
    }

    /// Runs the whole pipeline. The first error aborts the run and no map is
    /// returned.
    pub fn generate(&mut self, config: &GenerationConfig) -> Result<TiledMap> {
        self.stage = GenerationStage::Init;
        config.validate()?;
        info!(
            columns = config.columns,
            rows = config.rows,
            cities = config.num_cities + 1,
            "generating map"
        );

        let terrain_noise = self.generate_noise_grid(config)?;
        let mut forest_noise = self.generate_noise_grid(config)?;
        self.advance(GenerationStage::NoiseGenerated);

        let cities = self.calculate_cities_distribution(config);
        self.advance(GenerationStage::CitiesPlaced);

        let influence = build_influence_grid(&cities, config.columns, config.rows)?;
        let terrain = HeightGrid::add(&terrain_noise, &influence)?;
        forest_noise.round_values(config.forest_level);
        let forest = HeightGrid::cut(&forest_noise, &terrain, config.water_level, CutMode::KeepAbove)?;
        let forest = HeightGrid::cut(&forest, &influence, CITY_CLEARING_THRESHOLD, CutMode::KeepBelow)?;
        self.advance(GenerationStage::FieldsComposed);

        let map = TiledMap::classify(config.water_level, terrain, forest, influence, cities)?;
        self.advance(GenerationStage::Classified);

        let counts = map.terrain_counts();
        info!(?counts, "map generated");
        trace!("\n{}", map.render_ascii());
        Ok(map)
    }

    /// A fresh lattice per call keeps terrain and forest uncorrelated.
    fn generate_noise_grid(&mut self, config: &GenerationConfig) -> Result<HeightGrid> {
        let noise = NoiseField::seeded(config.columns, config.rows, &mut self.rng);
        let values = noise.generate(
            noise.width(),
            noise.height(),
            config.terrain_num_octaves,
            config.terrain_scaling_bias,
        )?;
        HeightGrid::from_values(config.columns, config.rows, values)
    }

    /// Drops the central city and `num_cities` smaller ones at random, then
    /// relaxes them apart.
    fn calculate_cities_distribution(&mut self, config: &GenerationConfig) -> Vec<City> {
        let width = config.columns as f64;
        let height = config.rows as f64;
        let mut ids = IdAllocator::new();
        let mut cities = Vec::with_capacity(config.num_cities + 1);

        let radii = std::iter::once(config.central_city_radius)
            .chain(std::iter::repeat(config.city_radius).take(config.num_cities));
        for radius in radii {
            let position = DVec2::new(self.rng.gen::<f64>() * width, self.rng.gen::<f64>() * height);
            cities.push(City::new(
                ids.next_id(),
                position,
                radius,
                radius * INNER_RADIUS_RATIO,
            ));
        }

        relax(&mut cities, Bounds::inset(width, height));
        debug!(
            positions = ?cities.iter().map(|c| (c.position().x, c.position().y)).collect::<Vec<_>>(),
            "cities relaxed"
        );
        cities
    }
}

/// Generates a map with a ChaCha8 generator seeded from `seed`.
pub fn generate(config: &GenerationConfig, seed: u64) -> Result<TiledMap> {
    MapGenerator::new(seed).generate(config)
}
