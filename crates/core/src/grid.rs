//! The rectangular grid of cells handed over by a table detector.

use crate::error::{Result, StructureError};
use serde::{Deserialize, Serialize};

/// A single grid cell. `None` continues the value to its left (or above).
pub type Cell = Option<String>;

/// An immutable, rectangular grid of cells.
///
/// Row 0 is always a header row; how many further rows belong to the
/// header is decided per column range by [`crate::header::header_depth`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct CellGrid {
    rows: Vec<Vec<Cell>>,
}

impl CellGrid {
    /// Build a grid, checking that it is non-empty and rectangular.
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(StructureError::EmptyGrid);
        }

        if let Some((row, actual)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != width)
        {
            return Err(StructureError::RaggedRow {
                row,
                expected: width,
                actual,
            });
        }

        Ok(Self { rows })
    }

    /// Build a grid from borrowed string cells.
    pub fn from_rows<S: AsRef<str>>(rows: Vec<Vec<Option<S>>>) -> Result<Self> {
        Self::new(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|cell| cell.map(|s| s.as_ref().to_string()))
                        .collect()
                })
                .collect(),
        )
    }

    /// Number of rows, header rows included.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }
}

impl TryFrom<Vec<Vec<Cell>>> for CellGrid {
    type Error = StructureError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<CellGrid> for Vec<Vec<Cell>> {
    fn from(grid: CellGrid) -> Self {
        grid.rows
    }
}
