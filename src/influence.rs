use glam::DVec2;

use crate::agent::City;
use crate::error::Result;
use crate::height_grid::HeightGrid;

/// Claim a city has on a point `distance` away from its center: full inside
/// the inner radius, fading linearly to zero at the outer radius.
pub fn falloff(city: &City, distance: f64) -> f64 {
    if distance > city.radius() {
        0.0
    } else if distance <= city.inner_radius() {
        1.0
    } else {
        1.0 - (distance - city.inner_radius()) / (city.radius() - city.inner_radius())
    }
}

/// Rasterizes city footprints into a `columns x rows` grid.
///
/// Overlapping footprints add up but never past 1.0.
pub fn build_influence_grid(cities: &[City], columns: usize, rows: usize) -> Result<HeightGrid> {
    let mut values = vec![0.0; columns * rows];
    for row in 0..rows {
        for column in 0..columns {
            let cell = DVec2::new(column as f64, row as f64);
            let value = &mut values[column + row * columns];
            for city in cities {
                let claim = falloff(city, city.position().distance(cell));
                *value = (*value + claim).min(1.0);
            }
        }
    }
    HeightGrid::from_values(columns, rows, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;

    fn city(x: f64, y: f64, radius: f64, inner: f64) -> City {
        City::new(AgentId(1), DVec2::new(x, y), radius, inner)
    }

    #[test]
    fn test_single_city_profile() {
        let c = city(10.0, 10.0, 5.0, 2.0);
        assert_eq!(falloff(&c, 0.0), 1.0);
        assert_eq!(falloff(&c, 2.0), 1.0);
        assert!((falloff(&c, 3.5) - 0.5).abs() < 1e-12);
        assert_eq!(falloff(&c, 5.0), 0.0);
        assert_eq!(falloff(&c, 6.0), 0.0);
    }

    #[test]
    fn test_grid_matches_falloff() {
        let cities = vec![city(10.0, 10.0, 5.0, 2.0)];
        let grid = build_influence_grid(&cities, 20, 20).unwrap();
        assert_eq!(grid.get(10, 10).unwrap(), 1.0);
        // (13, 10) is 3 away: 1 - 1/3
        assert!((grid.get(13, 10).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(grid.get(16, 10).unwrap(), 0.0);
        assert_eq!(grid.get(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_half_cell_center_hits_half_claim() {
        let cities = vec![city(10.0, 10.5, 5.0, 2.0)];
        let grid = build_influence_grid(&cities, 20, 20).unwrap();
        // (10, 14) is 3.5 from the center
        assert!((grid.get(10, 14).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_saturates() {
        let cities = vec![city(5.0, 5.0, 4.0, 1.0), city(6.0, 5.0, 4.0, 1.0)];
        let grid = build_influence_grid(&cities, 12, 12).unwrap();
        assert!(grid.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(grid.get(5, 5).unwrap(), 1.0);
        // both cities reach (8, 5) partially: 1/3 + 2/3
        assert!((grid.get(8, 5).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_cities_empty_field() {
        let grid = build_influence_grid(&[], 4, 3).unwrap();
        assert!(grid.values().iter().all(|&v| v == 0.0));
    }
}
