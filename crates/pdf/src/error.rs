use pdftab_core::StructureError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to read PDF file: {0}")]
    ReadError(String),

    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    #[error("Invalid table structure: {0}")]
    Structure(#[from] StructureError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PdfError>;
