use thiserror::Error;

/// Errors raised while building or combining map fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// An argument or configuration value is out of its allowed range.
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// Two grids taking part in one operation have different shapes.
    #[error("grid dimensions differ: expected {}x{}, found {}x{}", .expected.0, .expected.1, .found.0, .found.1)]
    DimensionMismatch {
        /// `(columns, rows)` of the left operand
        expected: (usize, usize),
        /// `(columns, rows)` of the right operand
        found: (usize, usize),
    },

    /// A coordinate lies outside the grid.
    #[error("coordinates ({column}, {row}) outside {columns}x{rows} grid")]
    IndexOutOfBounds {
        column: usize,
        row: usize,
        columns: usize,
        rows: usize,
    },
}

impl MapError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        MapError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = MapError::validation("num_octaves", "must be greater than zero");
        assert_eq!(err.to_string(), "invalid num_octaves: must be greater than zero");

        let err = MapError::DimensionMismatch {
            expected: (4, 3),
            found: (2, 2),
        };
        assert_eq!(err.to_string(), "grid dimensions differ: expected 4x3, found 2x2");

        let err = MapError::IndexOutOfBounds {
            column: 5,
            row: 0,
            columns: 5,
            rows: 5,
        };
        assert!(err.to_string().contains("(5, 0)"));
    }
}
