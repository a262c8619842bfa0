//! Error types for table reconstruction.

use thiserror::Error;

/// Result type for structure operations.
pub type Result<T> = std::result::Result<T, StructureError>;

/// A grid or header tree that cannot be turned into a nested table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// The grid has no rows, or its first row has no cells.
    #[error("Table grid is empty")]
    EmptyGrid,

    /// A row does not have the same width as the first row.
    #[error("Ragged table grid: row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A header cell that starts a column span carries no label.
    #[error("Missing header label at row {row}, column {column}")]
    MissingHeaderLabel { row: usize, column: usize },

    /// Two columns at the same level resolve to the same key.
    #[error("Duplicate header '{label}' at row {row}")]
    DuplicateHeader { label: String, row: usize },
}
