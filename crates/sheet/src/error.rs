use pdftab_core::StructureError;
use thiserror::Error;

/// Errors that can occur during sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Column index out of bounds: {index} (sheet has {count} columns)")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    #[error("Row index out of bounds: {index} (sheet has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    #[error("Columns not named: {0}")]
    ColumnsNotNamed(String),

    #[error("Duplicate column name: {name}")]
    DuplicateColumnName { name: String },

    #[error("Data length mismatch in column '{column}': expected {expected}, got {actual}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{name}' still has sub-headers; flatten the table first")]
    NestedColumn { name: String },

    #[error("Cannot parse '{value}' in column '{column}' (row {row}) as a {locale} integer")]
    ValueParse {
        column: String,
        row: usize,
        value: String,
        locale: String,
    },

    #[error("No translation for '{value}' in column '{column}'")]
    TranslationMiss { column: String, value: String },

    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    #[error("Invalid table structure: {0}")]
    Structure(#[from] StructureError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
