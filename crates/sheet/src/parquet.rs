//! Arrow and Parquet support for Sheet
//!
//! Normalized tables are written as Parquet; the same Arrow batch backs the
//! console preview.

use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

impl Sheet {
    /// Load a sheet from a Parquet file. The schema's field names become the
    /// header row.
    ///
    /// # Example
    /// ```no_run
    /// use pdftab_sheet::Sheet;
    ///
    /// let sheet = Sheet::from_parquet("licences.parquet").unwrap();
    /// ```
    pub fn from_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema().clone();
        let reader = builder.build()?;

        let mut data: Vec<Vec<CellValue>> = vec![schema
            .fields()
            .iter()
            .map(|f| CellValue::String(f.name().clone()))
            .collect()];

        for batch in reader {
            let batch = batch?;
            for row_idx in 0..batch.num_rows() {
                data.push(
                    batch
                        .columns()
                        .iter()
                        .map(|array| arrow_array_to_cell(array, row_idx))
                        .collect(),
                );
            }
        }

        let name = path
            .as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1");
        let mut sheet = Sheet::with_name(name);
        *sheet.data_mut() = data;
        sheet.name_columns_by_row(0)?;
        Ok(sheet)
    }

    /// Convert the data rows to an Arrow record batch. Column types are
    /// inferred from the cells; null-only columns become Utf8.
    ///
    /// Requires columns to be named.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let column_names = self.column_names().ok_or_else(|| {
            SheetError::ColumnsNotNamed("Columns must be named to export".to_string())
        })?;

        let data_rows: Vec<&Vec<CellValue>> = self.data().iter().skip(1).collect();
        let col_types: Vec<DataType> = (0..column_names.len())
            .map(|col_idx| infer_column_type(&data_rows, col_idx))
            .collect();

        let fields: Vec<Field> = column_names
            .iter()
            .zip(&col_types)
            .map(|(name, dtype)| Field::new(name, dtype.clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));

        let arrays: Vec<ArrayRef> = col_types
            .iter()
            .enumerate()
            .map(|(col_idx, dtype)| build_arrow_array(&data_rows, col_idx, dtype))
            .collect();

        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Save the sheet to a Parquet file
    ///
    /// # Example
    /// ```no_run
    /// use pdftab_sheet::Sheet;
    ///
    /// let mut sheet = Sheet::from_data(vec![
    ///     vec!["Prefecture", "Total"],
    ///     vec!["Hokkaido", "1234"],
    /// ]);
    /// sheet.name_columns_by_row(0).unwrap();
    /// sheet.save_as_parquet("licences.parquet").unwrap();
    /// ```
    pub fn save_as_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let batch = self.to_record_batch()?;
        let file = File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    /// Render the sheet as a boxed text table for the console.
    pub fn to_pretty_string(&self) -> Result<String> {
        let batch = self.to_record_batch()?;
        Ok(pretty_format_batches(&[batch])?.to_string())
    }
}

/// Convert an Arrow array element at a given index to a CellValue
fn arrow_array_to_cell(array: &ArrayRef, idx: usize) -> CellValue {
    if array.is_null(idx) {
        return CellValue::Null;
    }

    let any = array.as_any();
    let typed = match array.data_type() {
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|arr| CellValue::Bool(arr.value(idx))),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|arr| CellValue::Int(arr.value(idx))),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|arr| CellValue::Float(arr.value(idx))),
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|arr| CellValue::String(arr.value(idx).to_string())),
        _ => None,
    };

    typed.unwrap_or_else(|| {
        arrow::util::display::array_value_to_string(array, idx)
            .map_or_else(|_| CellValue::Null, CellValue::String)
    })
}

/// Infer the Arrow DataType for a column based on cell values
fn infer_column_type(rows: &[&Vec<CellValue>], col_idx: usize) -> DataType {
    let mut has_bool = false;
    let mut has_int = false;
    let mut has_float = false;

    for cell in rows.iter().filter_map(|row| row.get(col_idx)) {
        match cell {
            CellValue::Null => {}
            CellValue::Bool(_) => has_bool = true,
            CellValue::Int(_) => has_int = true,
            CellValue::Float(_) => has_float = true,
            CellValue::String(_) => return DataType::Utf8,
        }
    }

    if has_float {
        DataType::Float64
    } else if has_int {
        DataType::Int64
    } else if has_bool {
        DataType::Boolean
    } else {
        DataType::Utf8
    }
}

/// Build an Arrow array from column data
fn build_arrow_array(rows: &[&Vec<CellValue>], col_idx: usize, dtype: &DataType) -> ArrayRef {
    let cells = rows.iter().map(|row| row.get(col_idx));
    match dtype {
        DataType::Boolean => Arc::new(BooleanArray::from(
            cells
                .map(|c| c.and_then(CellValue::as_bool))
                .collect::<Vec<_>>(),
        )),
        DataType::Int64 => Arc::new(Int64Array::from(
            cells
                .map(|c| c.and_then(CellValue::as_int))
                .collect::<Vec<_>>(),
        )),
        DataType::Float64 => Arc::new(Float64Array::from(
            cells
                .map(|c| c.and_then(CellValue::as_float))
                .collect::<Vec<_>>(),
        )),
        _ => Arc::new(StringArray::from(
            cells
                .map(|c| c.filter(|cell| !cell.is_null()).map(CellValue::as_str))
                .collect::<Vec<_>>(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn licence_sheet() -> Sheet {
        let mut sheet = Sheet::new();
        *sheet.data_mut() = vec![
            vec![CellValue::from("Prefecture"), CellValue::from("Total")],
            vec![CellValue::from("Hokkaido"), CellValue::Int(1234)],
            vec![CellValue::from("Aomori"), CellValue::Null],
        ];
        sheet.name_columns_by_row(0).unwrap();
        sheet
    }

    #[test]
    fn test_record_batch_types() {
        let batch = licence_sheet().to_record_batch().unwrap();
        let schema = batch.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(1).data_type(), &DataType::Int64);
        assert_eq!(batch.num_rows(), 2);
    }

    #[test]
    fn test_parquet_roundtrip_keeps_types() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("licences.parquet");

        let sheet = licence_sheet();
        sheet.save_as_parquet(&file_path).unwrap();
        let loaded = Sheet::from_parquet(&file_path).unwrap();

        assert_eq!(loaded.name(), "licences");
        assert_eq!(loaded.column_names(), sheet.column_names());
        assert_eq!(loaded.data(), sheet.data());
    }

    #[test]
    fn test_parquet_header_only() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.parquet");

        let mut sheet = Sheet::from_data(vec![vec!["a", "b"]]);
        sheet.name_columns_by_row(0).unwrap();
        sheet.save_as_parquet(&file_path).unwrap();

        let loaded = Sheet::from_parquet(&file_path).unwrap();
        assert_eq!(loaded.row_count(), 1);
        assert_eq!(loaded.col_count(), 2);
    }

    #[test]
    fn test_save_requires_named_columns() {
        let dir = tempdir().unwrap();
        let sheet = Sheet::from_data(vec![vec!["a"], vec!["1"]]);
        let result = sheet.save_as_parquet(dir.path().join("x.parquet"));
        assert!(matches!(result, Err(SheetError::ColumnsNotNamed(_))));
    }

    #[test]
    fn test_pretty_string() {
        let text = licence_sheet().to_pretty_string().unwrap();
        assert!(text.contains("| Prefecture | Total |"));
        assert!(text.contains("| Hokkaido   | 1234  |"));
    }
}
