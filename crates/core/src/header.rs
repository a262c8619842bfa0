//! Merge-span and header-depth detection.
//!
//! PDF table detectors report a horizontally merged cell as its label in
//! the leftmost column followed by `None` for every column it covers. A
//! row "has a merge span" over a column range when it contains such
//! continuation cells, and consecutive rows with merge spans are treated
//! as extra header rows.

use crate::grid::Cell;

/// When the only null in a range sits at its first position, the cell is
/// taken to be the continuation of a vertically merged label from the row
/// above (typically the row-label column), not a horizontal merge.
pub const LEADING_NULL_IS_VERTICAL_MERGE: bool = true;

/// Whether `row[start_col..end_col]` contains a horizontal merge span.
///
/// Returns false when the range holds no nulls, and false when the only
/// null is at relative position 0 (see [`LEADING_NULL_IS_VERTICAL_MERGE`]).
#[must_use]
pub fn has_merge_span(row: &[Cell], start_col: usize, end_col: usize) -> bool {
    let end_col = end_col.min(row.len());
    if start_col >= end_col {
        return false;
    }

    let mut nulls = row[start_col..end_col]
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_none())
        .map(|(i, _)| i);

    match (nulls.next(), nulls.next()) {
        (None, _) => false,
        (Some(0), None) => !LEADING_NULL_IS_VERTICAL_MERGE,
        _ => true,
    }
}

/// Number of rows below `rows[0]` that still belong to the header for
/// the given column range.
///
/// Counts consecutive rows, starting at `rows[1]`, that have a merge span
/// in `[start_col, end_col)`. Never runs past the last row.
#[must_use]
pub fn header_depth(rows: &[Vec<Cell>], start_col: usize, end_col: usize) -> usize {
    let mut depth = 0;
    while depth + 1 < rows.len() && has_merge_span(&rows[depth + 1], start_col, end_col) {
        depth += 1;
    }
    depth
}
