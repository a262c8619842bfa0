//! Where page grids come from.

use crate::error::{PdfError, Result};
use crate::extractor::{PdfExtractor, PdfOptions};
use pdftab_core::{Cell, CellGrid};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// The table found on one page, if any.
///
/// Rows are kept as handed over by the detector; they are checked when
/// the page is processed so that one malformed page does not spoil the
/// rest of the document.
#[derive(Debug, Clone)]
pub struct PageTable {
    /// 1-based page number.
    pub number: usize,
    pub rows: Option<Vec<Vec<Cell>>>,
}

impl PageTable {
    /// Validate the page's rows into a grid. `Ok(None)` for a page
    /// without a table.
    pub fn grid(&self) -> Result<Option<CellGrid>> {
        self.rows
            .clone()
            .map(CellGrid::new)
            .transpose()
            .map_err(PdfError::from)
    }
}

/// A document split into page tables by some table detector.
pub trait GridSource {
    fn pages(&self) -> Result<Vec<PageTable>>;
}

/// Detects tables directly in a PDF file.
pub struct PdfGridSource {
    path: PathBuf,
    extractor: PdfExtractor,
}

impl PdfGridSource {
    pub fn new<P: AsRef<Path>>(path: P, options: PdfOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            extractor: PdfExtractor::new(options),
        }
    }
}

impl GridSource for PdfGridSource {
    fn pages(&self) -> Result<Vec<PageTable>> {
        Ok(self
            .extractor
            .extract_tables_from_path(&self.path)?
            .into_iter()
            .map(|(number, region)| PageTable {
                number,
                rows: region.map(|r| r.grid.into_rows()),
            })
            .collect())
    }
}

/// Reads grids produced by an external table detector.
///
/// The file holds a JSON array with one entry per page, in page order:
/// `null` for a page without a table, otherwise an array of rows whose
/// cells are strings or `null`.
///
/// ```json
/// [null, [["A", "B"], [null, null], ["1", "2"]]]
/// ```
pub struct JsonGridSource {
    path: PathBuf,
}

impl JsonGridSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse page grids from a JSON string.
    pub fn parse_str(content: &str) -> Result<Vec<PageTable>> {
        let pages: Vec<Option<Vec<Vec<Cell>>>> = serde_json::from_str(content)?;
        Ok(into_page_tables(pages))
    }
}

impl GridSource for JsonGridSource {
    fn pages(&self) -> Result<Vec<PageTable>> {
        let file = File::open(&self.path).map_err(|e| {
            PdfError::ReadError(format!("{}: {}", self.path.display(), e))
        })?;
        let pages: Vec<Option<Vec<Vec<Cell>>>> = serde_json::from_reader(BufReader::new(file))?;
        Ok(into_page_tables(pages))
    }
}

fn into_page_tables(pages: Vec<Option<Vec<Vec<Cell>>>>) -> Vec<PageTable> {
    pages
        .into_iter()
        .enumerate()
        .map(|(idx, rows)| PageTable {
            number: idx + 1,
            rows,
        })
        .collect()
}
