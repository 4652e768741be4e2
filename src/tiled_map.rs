use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agent::City;
use crate::error::{MapError, Result};
use crate::height_grid::HeightGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    Water,
    Land,
    Forest,
}

impl TerrainType {
    /// Classifies one cell from its final terrain height and forest mask value.
    pub fn classify(terrain: f64, forest: f64, water_level: f64) -> Self {
        if terrain <= water_level {
            TerrainType::Water
        } else if forest == 1.0 {
            TerrainType::Forest
        } else {
            TerrainType::Land
        }
    }

    pub fn ascii(&self) -> char {
        match self {
            TerrainType::Water => '~',
            TerrainType::Land => '.',
            TerrainType::Forest => '♣',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapTile {
    pub coordinates: (usize, usize), // (column, row)
    pub terrain_type: TerrainType,
}

/// The classified map plus the fields it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTiledMap")]
pub struct TiledMap {
    columns: usize,
    rows: usize,
    tiles: Vec<MapTile>,
    terrain: HeightGrid,
    forest: HeightGrid,
    influence: HeightGrid,
    cities: Vec<City>,
}

#[derive(Deserialize)]
struct RawTiledMap {
    columns: usize,
    rows: usize,
    tiles: Vec<MapTile>,
    terrain: HeightGrid,
    forest: HeightGrid,
    influence: HeightGrid,
    cities: Vec<City>,
}

/// Decoded maps must have one tile per cell in row-major order and fields of
/// the map's own shape, or `tile` would index past the end.
impl TryFrom<RawTiledMap> for TiledMap {
    type Error = MapError;

    fn try_from(raw: RawTiledMap) -> Result<Self> {
        let shape = (raw.columns, raw.rows);
        for field in [&raw.terrain, &raw.forest, &raw.influence] {
            check_shape(shape, field)?;
        }

        if raw.tiles.len() != raw.columns * raw.rows {
            return Err(MapError::validation(
                "tiles",
                format!(
                    "expected {} tiles for a {}x{} map, got {}",
                    raw.columns * raw.rows,
                    raw.columns,
                    raw.rows,
                    raw.tiles.len()
                ),
            ));
        }
        let misplaced = raw
            .tiles
            .iter()
            .enumerate()
            .find(|(index, tile)| tile.coordinates != (index % raw.columns, index / raw.columns));
        if let Some((index, tile)) = misplaced {
            return Err(MapError::validation(
                "tiles",
                format!("tile {index} has coordinates {:?}", tile.coordinates),
            ));
        }

        Ok(TiledMap {
            columns: raw.columns,
            rows: raw.rows,
            tiles: raw.tiles,
            terrain: raw.terrain,
            forest: raw.forest,
            influence: raw.influence,
            cities: raw.cities,
        })
    }
}

fn check_shape(expected: (usize, usize), grid: &HeightGrid) -> Result<()> {
    let found = (grid.columns(), grid.rows());
    if found != expected {
        return Err(MapError::DimensionMismatch { expected, found });
    }
    Ok(())
}

impl TiledMap {
    /// Classifies every cell of the composed fields.
    pub fn classify(
        water_level: f64,
        terrain: HeightGrid,
        forest: HeightGrid,
        influence: HeightGrid,
        cities: Vec<City>,
    ) -> Result<Self> {
        for other in [&forest, &influence] {
            check_shape((terrain.columns(), terrain.rows()), other)?;
        }

        let columns = terrain.columns();
        let rows = terrain.rows();
        let tiles = terrain
            .values()
            .iter()
            .zip(forest.values())
            .enumerate()
            .map(|(index, (&height, &trees))| MapTile {
                coordinates: (index % columns, index / columns),
                terrain_type: TerrainType::classify(height, trees, water_level),
            })
            .collect();

        Ok(TiledMap {
            columns,
            rows,
            tiles,
            terrain,
            forest,
            influence,
            cities,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile(&self, column: usize, row: usize) -> Result<&MapTile> {
        if column >= self.columns || row >= self.rows {
            return Err(MapError::IndexOutOfBounds {
                column,
                row,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(&self.tiles[column + self.columns * row])
    }

    pub fn tiles(&self) -> &[MapTile] {
        &self.tiles
    }

    /// Final terrain heights, city influence included.
    pub fn terrain(&self) -> &HeightGrid {
        &self.terrain
    }

    /// Binary forest mask after pruning.
    pub fn forest(&self) -> &HeightGrid {
        &self.forest
    }

    pub fn influence(&self) -> &HeightGrid {
        &self.influence
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn terrain_counts(&self) -> BTreeMap<TerrainType, usize> {
        let mut counts = BTreeMap::new();
        for tile in &self.tiles {
            *counts.entry(tile.terrain_type).or_insert(0) += 1;
        }
        counts
    }

    /// One line per row, one character per tile.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.columns + 1) * self.rows * 3);
        for row in self.tiles.chunks(self.columns) {
            out.extend(row.iter().map(|tile| tile.terrain_type.ascii()));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(values: &[f64]) -> HeightGrid {
        HeightGrid::from_values(2, 2, values.to_vec()).unwrap()
    }

    fn sample_map() -> TiledMap {
        TiledMap::classify(
            0.4,
            grid(&[0.2, 0.4, 0.5, 0.9]),
            grid(&[1.0, 0.0, 1.0, 0.0]),
            grid(&[0.0; 4]),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_classify_cell() {
        assert_eq!(TerrainType::classify(0.4, 1.0, 0.4), TerrainType::Water);
        assert_eq!(TerrainType::classify(0.41, 1.0, 0.4), TerrainType::Forest);
        assert_eq!(TerrainType::classify(0.41, 0.99, 0.4), TerrainType::Land);
    }

    #[test]
    fn test_tiles_by_coordinates() {
        let map = sample_map();
        assert_eq!(map.columns(), 2);
        assert_eq!(map.rows(), 2);
        assert_eq!(map.tile(0, 0).unwrap().terrain_type, TerrainType::Water);
        assert_eq!(map.tile(1, 0).unwrap().terrain_type, TerrainType::Water);
        assert_eq!(map.tile(0, 1).unwrap().terrain_type, TerrainType::Forest);
        assert_eq!(map.tile(1, 1).unwrap().terrain_type, TerrainType::Land);
        assert_eq!(map.tile(0, 1).unwrap().coordinates, (0, 1));
    }

    #[test]
    fn test_tile_out_of_range() {
        let map = sample_map();
        assert!(matches!(map.tile(2, 0), Err(MapError::IndexOutOfBounds { .. })));
        assert!(matches!(map.tile(0, 2), Err(MapError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_mismatched_fields_rejected() {
        let wide = HeightGrid::new(3, 2).unwrap();
        let result = TiledMap::classify(0.4, grid(&[0.0; 4]), wide, grid(&[0.0; 4]), Vec::new());
        assert!(matches!(result, Err(MapError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_counts_and_ascii() {
        let map = sample_map();
        let counts = map.terrain_counts();
        assert_eq!(counts[&TerrainType::Water], 2);
        assert_eq!(counts[&TerrainType::Forest], 1);
        assert_eq!(counts[&TerrainType::Land], 1);
        assert_eq!(map.render_ascii(), "~~\n♣.\n");
    }

    #[test]
    fn test_deserialize_accepts_serialized_map() {
        let json = serde_json::to_string(&sample_map()).unwrap();
        let map: TiledMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map.tile(1, 1).unwrap().terrain_type, TerrainType::Land);
        assert!(matches!(map.tile(2, 1), Err(MapError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_maps() {
        let mut json = serde_json::to_value(sample_map()).unwrap();

        // claims more rows than it has tiles for
        let mut taller = json.clone();
        taller["rows"] = 3.into();
        assert!(serde_json::from_value::<TiledMap>(taller).is_err());

        let mut short = json.clone();
        short["tiles"].as_array_mut().unwrap().pop();
        let err = serde_json::from_value::<TiledMap>(short).unwrap_err();
        assert!(err.to_string().contains("expected 4 tiles"), "{err}");

        json["tiles"][0]["coordinates"] = serde_json::json!([1, 1]);
        let err = serde_json::from_value::<TiledMap>(json).unwrap_err();
        assert!(err.to_string().contains("tile 0"), "{err}");
    }
}
