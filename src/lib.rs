//! Procedural tile maps for a strategy-game world.
//!
//! A run layers two value-noise fields (terrain and forest), scatters city
//! sites and relaxes them apart, stamps the cities' footprints onto the
//! terrain, prunes the forest, and classifies every cell as water, land or
//! forest.
//!
//! ```no_run
//! use kingdom_mapper::{GenerationConfig, MapGenerator, TerrainType};
//!
//! let map = MapGenerator::new(42).generate(&GenerationConfig::default())?;
//! if map.tile(10, 10)?.terrain_type == TerrainType::Water {
//!     println!("wet");
//! }
//! # Ok::<(), kingdom_mapper::MapError>(())
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod height_grid;
pub mod influence;
pub mod map_generator;
pub mod noise_field;
pub mod steering;
pub mod tiled_map;

pub use agent::{Agent, AgentId, City, IdAllocator};
pub use config::GenerationConfig;
pub use error::{MapError, Result};
pub use height_grid::{CutMode, HeightGrid};
pub use map_generator::{generate, GenerationStage, MapGenerator};
pub use noise_field::NoiseField;
pub use tiled_map::{MapTile, TerrainType, TiledMap};
