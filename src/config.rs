use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub columns: usize,
    pub rows: usize,
    pub water_level: f64,     // cells at or below this are water
    pub forest_level: f64,    // forest noise above this grows trees
    pub terrain_num_octaves: u32,
    pub terrain_scaling_bias: f64,
    pub num_cities: usize,    // besides the central city
    pub central_city_radius: f64,
    pub city_radius: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            columns: 64,
            rows: 48,
            water_level: 0.4,
            forest_level: 0.55,
            terrain_num_octaves: 4,
            terrain_scaling_bias: 2.0,
            num_cities: 6,
            central_city_radius: 10.0,
            city_radius: 6.0,
        }
    }
}

impl GenerationConfig {
    /// Checks every field range before any work is done.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(MapError::validation("columns", "must be greater than zero"));
        }
        if self.rows == 0 {
            return Err(MapError::validation("rows", "must be greater than zero"));
        }
        check_unit("water_level", self.water_level)?;
        check_unit("forest_level", self.forest_level)?;
        if self.terrain_num_octaves == 0 {
            return Err(MapError::validation(
                "terrain_num_octaves",
                "must be at least one",
            ));
        }
        check_positive("terrain_scaling_bias", self.terrain_scaling_bias)?;
        check_positive("central_city_radius", self.central_city_radius)?;
        check_positive("city_radius", self.city_radius)?;
        Ok(())
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MapError::validation(field, format!("{value} is outside [0, 1]")))
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(MapError::validation(field, format!("{value} must be positive")))
    }
}
