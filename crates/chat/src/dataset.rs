//! Parquet datasets handed to the chat agent.

use crate::catalog::DatasetEntry;
use crate::error::Result;
use pdftab_sheet::Sheet;

/// A named, described table loaded from Parquet.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub description: String,
    pub sheet: Sheet,
}

impl Dataset {
    /// Load the entry's Parquet file. With `trim_total_row` the last data
    /// row, the table's aggregate, is dropped so it does not skew answers.
    pub fn load(entry: &DatasetEntry, trim_total_row: bool) -> Result<Self> {
        let mut sheet = Sheet::from_parquet(&entry.path)?;
        sheet.set_name(&entry.name);
        if trim_total_row && sheet.drop_last_data_row().is_some() {
            tracing::debug!(dataset = %entry.name, "Dropped total row");
        }
        tracing::info!(
            dataset = %entry.name,
            rows = sheet.data_row_count(),
            columns = sheet.col_count(),
            "Loaded dataset"
        );

        Ok(Self {
            name: entry.name.clone(),
            description: entry.description.clone(),
            sheet,
        })
    }

    /// Describe the dataset for a prompt: name, description, columns and
    /// the first `max_rows` data rows as CSV.
    pub fn summary(&self, max_rows: usize) -> Result<String> {
        let columns = self
            .sheet
            .column_names()
            .map(|names| names.join(", "))
            .unwrap_or_default();

        let keep = (max_rows + 1).min(self.sheet.row_count());
        let mut head = Sheet::with_name(&self.name);
        *head.data_mut() = self.sheet.data()[..keep].to_vec();

        Ok(format!(
            "Dataset: {}\nDescription: {}\nRows: {}\nColumns: {}\nFirst rows (CSV):\n{}",
            self.name,
            self.description,
            self.sheet.data_row_count(),
            columns,
            head.to_csv_string()?
        ))
    }
}
