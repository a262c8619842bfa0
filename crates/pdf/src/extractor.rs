use crate::detector::{TableDetector, TableRegion};
use crate::error::{PdfError, Result};
use lopdf::Document;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// Inclusive, 1-based page range. `None` reads every page.
    pub page_range: Option<(usize, usize)>,
    pub min_table_rows: usize,
    pub min_table_cols: usize,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_range: None,
            min_table_rows: 2,
            min_table_cols: 2,
        }
    }
}

pub struct PdfExtractor {
    options: PdfOptions,
    detector: TableDetector,
}

impl PdfExtractor {
    pub fn new(options: PdfOptions) -> Self {
        let detector = TableDetector::new(options.min_table_rows, options.min_table_cols);
        Self { options, detector }
    }

    /// Detect at most one table per page. Pages come back in order, with
    /// `None` for pages where no table was found.
    pub fn extract_tables_from_path(&self, path: &Path) -> Result<Vec<(usize, Option<TableRegion>)>> {
        let pages = self.extract_text_per_page(path)?;

        Ok(pages
            .into_iter()
            .map(|(page_num, text)| {
                let region = self.detector.detect_grid(&text);
                if region.is_none() {
                    tracing::debug!("No table detected on page {}", page_num);
                }
                (page_num, region)
            })
            .collect())
    }

    fn extract_text_per_page(&self, path: &Path) -> Result<Vec<(usize, String)>> {
        if !path.exists() {
            return Err(PdfError::ReadError(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let doc = Document::load(path)
            .map_err(|e| PdfError::ParseError(format!("Failed to load PDF: {}", e)))?;

        let page_count = doc.get_pages().len();
        let (start, end) = self.resolve_page_range(page_count)?;

        let mut results = Vec::new();
        let mut any_page_extracted = false;
        let mut last_error: Option<String> = None;

        for page_num in start..=end {
            match doc.extract_text(&[page_num as u32]) {
                Ok(content) => {
                    any_page_extracted = true;
                    results.push((page_num, content));
                }
                Err(e) => {
                    last_error = Some(e.to_string());
                    tracing::warn!("lopdf extract_text failed on page {}: {}", page_num, e);
                    results.push((page_num, String::new()));
                }
            }
        }

        if !any_page_extracted && end >= start {
            let error_suffix = last_error
                .as_ref()
                .map(|e| format!(": {}", e))
                .unwrap_or_default();
            return Err(PdfError::ParseError(format!(
                "Failed to extract text from any page{}",
                error_suffix
            )));
        }

        Ok(results)
    }

    fn resolve_page_range(&self, page_count: usize) -> Result<(usize, usize)> {
        let Some((s, e)) = self.options.page_range else {
            return Ok((1, page_count));
        };

        if s > e {
            return Err(PdfError::InvalidPageRange(format!(
                "Start page {} is greater than end page {}",
                s, e
            )));
        }
        if s < 1 {
            return Err(PdfError::InvalidPageRange(
                "Page numbers must be >= 1".to_string(),
            ));
        }
        let clamped_end = e.min(page_count);
        if s > clamped_end {
            return Err(PdfError::InvalidPageRange(format!(
                "Start page {} exceeds document length of {} pages",
                s, page_count
            )));
        }
        Ok((s, clamped_end))
    }
}
