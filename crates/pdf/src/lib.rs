//! # pdftab-pdf
//!
//! Turns the table on each page of a PDF into a nested JSON document
//! whose shape follows the table's (possibly multi-level) column headers.

pub mod detector;
pub mod error;
pub mod extractor;
pub mod source;

use error::Result;
use pdftab_core::{reconstruct, NestedTable};
use serde_json::ser::PrettyFormatter;
use source::{GridSource, PageTable};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// What happened to each page of a document.
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Files written, in page order.
    pub written: Vec<PathBuf>,
    /// Pages without a detected table.
    pub skipped: Vec<usize>,
    /// Pages whose table could not be reconstructed or written.
    pub failed: Vec<(usize, PdfError)>,
}

impl ExtractReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reconstruct and persist the table of every page that has one.
///
/// Each table is written to `<output_dir>/<stem>_page<N>.json`. A page
/// without a table is skipped; a page that fails is logged and recorded,
/// and the remaining pages are still processed.
pub fn extract_document<S: GridSource + ?Sized>(
    source: &S,
    stem: &str,
    output_dir: &Path,
) -> Result<ExtractReport> {
    let mut report = ExtractReport::default();

    for page in source.pages()? {
        match extract_page(&page, stem, output_dir) {
            Ok(Some(path)) => report.written.push(path),
            Ok(None) => report.skipped.push(page.number),
            Err(e) => {
                tracing::error!("Page {} failed: {}", page.number, e);
                report.failed.push((page.number, e));
            }
        }
    }

    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "extraction finished"
    );
    Ok(report)
}

fn extract_page(page: &PageTable, stem: &str, output_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(grid) = page.grid()? else {
        return Ok(None);
    };

    tracing::info!("Page {} has a table", page.number);
    tracing::debug!("{:?}", &grid.rows()[..grid.row_count().min(3)]);
    tracing::info!("Building JSON...");

    let nested = reconstruct(&grid)?;
    let path = output_dir.join(page_file_name(stem, page.number));
    write_nested_json(&nested, &path)?;
    Ok(Some(path))
}

/// `<stem>_page<N>.json`
#[must_use]
pub fn page_file_name(stem: &str, page_number: usize) -> String {
    format!("{stem}_page{page_number}.json")
}

/// The file name of `path` up to its first `.`.
#[must_use]
pub fn pdf_stem(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

/// Write a nested table as JSON indented by four spaces.
pub fn write_nested_json(nested: &NestedTable, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_nested_json_to(nested, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a nested table as JSON indented by four spaces.
pub fn write_nested_json_to<W: Write>(nested: &NestedTable, writer: W) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    serde::Serialize::serialize(nested, &mut ser)?;
    Ok(())
}

// Re-export commonly used types
pub use error::PdfError;
pub use extractor::PdfOptions;
pub use source::{JsonGridSource, PdfGridSource};
