use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kingdom_mapper::{GenerationConfig, MapGenerator, TerrainType, TiledMap};

#[derive(Debug, Parser)]
#[command(author, version, about = "Kingdom map generator")]
struct Cli {
    /// Seed for noise lattices and city placement (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 64)]
    columns: usize,

    #[arg(long, default_value_t = 48)]
    rows: usize,

    /// Cells at or below this height are water
    #[arg(long, default_value_t = 0.4)]
    water_level: f64,

    /// Forest noise above this grows trees
    #[arg(long, default_value_t = 0.55)]
    forest_level: f64,

    #[arg(long, default_value_t = 4)]
    octaves: u32,

    #[arg(long, default_value_t = 2.0)]
    scaling_bias: f64,

    /// Cities besides the central one
    #[arg(long, default_value_t = 6)]
    cities: usize,

    #[arg(long, default_value_t = 10.0)]
    central_city_radius: f64,

    #[arg(long, default_value_t = 6.0)]
    city_radius: f64,

    /// Print the whole map as JSON instead of ASCII
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> GenerationConfig {
        GenerationConfig {
            columns: self.columns,
            rows: self.rows,
            water_level: self.water_level,
            forest_level: self.forest_level,
            terrain_num_octaves: self.octaves,
            terrain_scaling_bias: self.scaling_bias,
            num_cities: self.cities,
            central_city_radius: self.central_city_radius,
            city_radius: self.city_radius,
        }
    }
}

fn print_terrain_info(map: &TiledMap) {
    let total_tiles = (map.columns() * map.rows()) as f64;
    println!("\nTerrain distribution:");
    for (terrain, count) in map.terrain_counts() {
        let percentage = count as f64 / total_tiles * 100.0;
        println!("  {} {:?} - {:.1}%", terrain.ascii(), terrain, percentage);
    }

    println!("\nCities: {}", map.cities().len());
    for city in map.cities() {
        let p = city.position();
        println!("  #{} at ({:.1}, {:.1}) radius {}", city.id().0, p.x, p.y, city.radius());
    }

    println!(
        "\nLegend: {} water  {} land  {} forest",
        TerrainType::Water.ascii(),
        TerrainType::Land.ascii(),
        TerrainType::Forest.ascii()
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);
    let config = cli.config();

    let map = MapGenerator::new(seed).generate(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string(&map)?);
    } else {
        println!("=== Kingdom Mapper (seed {seed}) ===\n");
        print!("{}", map.render_ascii());
        print_terrain_info(&map);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["mapper-cli"]);
        assert_eq!(cli.config(), GenerationConfig::default());
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["mapper-cli", "--columns", "10", "--rows", "8", "--cities", "0", "--seed", "5"]);
        let config = cli.config();
        assert_eq!(config.columns, 10);
        assert_eq!(config.rows, 8);
        assert_eq!(config.num_cities, 0);
        assert_eq!(cli.seed, Some(5));
    }
}
