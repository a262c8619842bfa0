//! Recursive header reconstruction.
//!
//! The top row of a column range is scanned left to right. A label
//! followed by nulls spans those columns and becomes a composite header
//! whose children are reconstructed from the rows below, restricted to
//! the spanned columns. A label without a span becomes a leaf holding
//! the column's data cells.

use crate::error::{Result, StructureError};
use crate::grid::{Cell, CellGrid};
use crate::header::header_depth;
use crate::node::{LeafValue, NestedTable, TableNode};
use indexmap::map::Entry;

/// Reconstruct the header tree of a whole grid.
pub fn reconstruct(grid: &CellGrid) -> Result<NestedTable> {
    tracing::debug!(
        rows = grid.row_count(),
        cols = grid.width(),
        "reconstructing table"
    );
    build(grid.rows(), 0, 0, grid.width())
}

/// Reconstruct the header tree of `rows` restricted to `[start_col, end_col)`.
///
/// `rows[0]` is the header row for the range. `end_col` is clamped to the
/// row width.
pub fn reconstruct_range(rows: &[Vec<Cell>], start_col: usize, end_col: usize) -> Result<NestedTable> {
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
    build(rows, 0, start_col, end_col.min(width))
}

/// `row_offset` is the absolute index of `rows[0]` in the original grid,
/// used only for error reporting.
fn build(rows: &[Vec<Cell>], row_offset: usize, start_col: usize, end_col: usize) -> Result<NestedTable> {
    let depth = header_depth(rows, start_col, end_col);
    let header = &rows[0];
    let mut table = NestedTable::new();

    tracing::trace!(row_offset, start_col, end_col, depth, "header range");

    let mut j = start_col;
    while j < end_col {
        let label = header[j]
            .as_ref()
            .ok_or(StructureError::MissingHeaderLabel {
                row: row_offset,
                column: j,
            })?;

        let mut k = j;
        while depth > 0 && k < end_col - 1 && header[k + 1].is_none() {
            k += 1;
        }

        let node = if k > j {
            TableNode::Composite(build(&rows[1..], row_offset + 1, j, k + 1)?)
        } else {
            TableNode::Leaf(column(&rows[depth + 1..], j))
        };

        match table.entry(label.clone()) {
            Entry::Occupied(_) => {
                return Err(StructureError::DuplicateHeader {
                    label: label.clone(),
                    row: row_offset,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }

        j = k + 1;
    }

    Ok(table)
}

fn column(rows: &[Vec<Cell>], col: usize) -> Vec<Option<LeafValue>> {
    rows.iter()
        .map(|row| row[col].clone().map(LeafValue::Text))
        .collect()
}
