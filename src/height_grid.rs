//! Dense 2D scalar fields and the algebra used to compose them.
//!
//! Values are nominally in `0.0..=1.0` but only the saturating operations
//! enforce that. Associated functions (`add`, `subtract`, `mask`, ...) are pure
//! and return a fresh grid. The in-place mutators hand back the grid they
//! changed, wrapped in `Result` when a shape check can fail, so calls chain.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Which side of the threshold survives a [`HeightGrid::cut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutMode {
    /// Keep cells whose mask value is strictly greater than the threshold.
    KeepAbove,
    /// Keep cells whose mask value is strictly less than the threshold.
    KeepBelow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHeightGrid")]
pub struct HeightGrid {
    columns: usize,
    rows: usize,
    values: Vec<f64>,
}

/// Unchecked wire form; decoding goes through [`HeightGrid::from_values`].
#[derive(Deserialize)]
struct RawHeightGrid {
    columns: usize,
    rows: usize,
    values: Vec<f64>,
}

impl TryFrom<RawHeightGrid> for HeightGrid {
    type Error = MapError;

    fn try_from(raw: RawHeightGrid) -> Result<Self> {
        HeightGrid::from_values(raw.columns, raw.rows, raw.values)
    }
}

impl HeightGrid {
    /// Creates a `columns x rows` grid filled with zeros.
    pub fn new(columns: usize, rows: usize) -> Result<Self> {
        Self::check_dimensions(columns, rows)?;
        Ok(HeightGrid {
            columns,
            rows,
            values: vec![0.0; columns * rows],
        })
    }

    /// Creates a grid from row-major values.
    pub fn from_values(columns: usize, rows: usize, values: Vec<f64>) -> Result<Self> {
        Self::check_dimensions(columns, rows)?;
        if values.len() != columns * rows {
            return Err(MapError::validation(
                "values",
                format!(
                    "expected {} values for a {}x{} grid, got {}",
                    columns * rows,
                    columns,
                    rows,
                    values.len()
                ),
            ));
        }
        Ok(HeightGrid { columns, rows, values })
    }

    fn check_dimensions(columns: usize, rows: usize) -> Result<()> {
        if columns == 0 {
            return Err(MapError::validation("columns", "must be greater than zero"));
        }
        if rows == 0 {
            return Err(MapError::validation("rows", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row-major view of the cells.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: usize, row: usize) -> Result<f64> {
        let index = self.index(column, row)?;
        Ok(self.values[index])
    }

    pub fn set(&mut self, column: usize, row: usize, value: f64) -> Result<()> {
        let index = self.index(column, row)?;
        self.values[index] = value;
        Ok(())
    }

    fn index(&self, column: usize, row: usize) -> Result<usize> {
        if column >= self.columns || row >= self.rows {
            return Err(MapError::IndexOutOfBounds {
                column,
                row,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(self.columns * row + column)
    }

    fn ensure_same_shape(&self, other: &HeightGrid) -> Result<()> {
        if self.columns != other.columns || self.rows != other.rows {
            return Err(MapError::DimensionMismatch {
                expected: (self.columns, self.rows),
                found: (other.columns, other.rows),
            });
        }
        Ok(())
    }

    /// Builds a new grid from the cellwise combination of two equally sized grids.
    fn zip_with(lhs: &HeightGrid, rhs: &HeightGrid, op: impl Fn(f64, f64) -> f64) -> Result<HeightGrid> {
        lhs.ensure_same_shape(rhs)?;
        let values = lhs
            .values
            .iter()
            .zip(&rhs.values)
            .map(|(&l, &r)| op(l, r))
            .collect();
        Ok(HeightGrid {
            columns: lhs.columns,
            rows: lhs.rows,
            values,
        })
    }

    // Pure combinators

    /// Cellwise sum saturated to `[0, 1]`.
    pub fn add(lhs: &HeightGrid, rhs: &HeightGrid) -> Result<HeightGrid> {
        Self::zip_with(lhs, rhs, |l, r| (l + r).max(0.0).min(1.0))
    }

    /// Cellwise difference, unclamped.
    pub fn subtract(lhs: &HeightGrid, rhs: &HeightGrid) -> Result<HeightGrid> {
        Self::zip_with(lhs, rhs, |l, r| l - r)
    }

    /// Cellwise sum clamped to `[min, max]`.
    pub fn saturate_by_addition(lhs: &HeightGrid, rhs: &HeightGrid, min: f64, max: f64) -> Result<HeightGrid> {
        Self::zip_with(lhs, rhs, |l, r| (l + r).max(min).min(max))
    }

    /// Multiplies `target` by `mask`, or by `1 - mask` when `invert` is set.
    pub fn mask(target: &HeightGrid, mask: &HeightGrid, invert: bool) -> Result<HeightGrid> {
        if invert {
            Self::zip_with(target, mask, |t, m| t * (1.0 - m))
        } else {
            Self::zip_with(target, mask, |t, m| t * m)
        }
    }

    /// Keeps `target` cells whose `mask` value passes the strict comparison
    /// selected by `mode`; every other cell becomes zero.
    pub fn cut(target: &HeightGrid, mask: &HeightGrid, threshold: f64, mode: CutMode) -> Result<HeightGrid> {
        Self::zip_with(target, mask, |t, m| {
            let keep = match mode {
                CutMode::KeepAbove => m > threshold,
                CutMode::KeepBelow => m < threshold,
            };
            if keep {
                t
            } else {
                0.0
            }
        })
    }

    // In-place mutators

    /// `self[i] = clamp(self[i] + other[i], 0, 1)`.
    pub fn saturating_add_in_place(&mut self, other: &HeightGrid) -> Result<&mut Self> {
        self.ensure_same_shape(other)?;
        for (value, &add) in self.values.iter_mut().zip(&other.values) {
            *value = (*value + add).max(0.0).min(1.0);
        }
        Ok(self)
    }

    /// Raises every cell to at least the matching `mask` cell.
    pub fn apply_minimum_mask(&mut self, mask: &HeightGrid) -> Result<&mut Self> {
        self.ensure_same_shape(mask)?;
        for (value, &floor) in self.values.iter_mut().zip(&mask.values) {
            *value = value.max(floor);
        }
        Ok(self)
    }

    /// Zeroes the cells of `other` whose own value is at or below `threshold`
    /// and returns `other`.
    ///
    /// `self` is only used to check that both grids share a shape; it is left
    /// untouched. Use [`HeightGrid::cut`] to filter one grid by another.
    pub fn cut_in_place_on_other<'a>(&self, other: &'a mut HeightGrid, threshold: f64) -> Result<&'a mut HeightGrid> {
        self.ensure_same_shape(other)?;
        for value in other.values.iter_mut() {
            if *value <= threshold {
                *value = 0.0;
            }
        }
        Ok(other)
    }

    /// Binarizes the grid: `1.0` where the value exceeds `threshold`, else `0.0`.
    pub fn round_values(&mut self, threshold: f64) -> &mut Self {
        for value in self.values.iter_mut() {
            *value = if *value > threshold { 1.0 } else { 0.0 };
        }
        self
    }
}
