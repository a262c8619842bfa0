use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::locale::NumberLocale;
use indexmap::IndexMap;
use pdftab_core::{LeafValue, NestedTable, TableNode};
use std::collections::HashMap;

/// A sheet representing a 2D grid of cells (row-major storage)
///
/// Once columns are named, row 0 is the header row and data starts at
/// row 1.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
    column_names: Option<Vec<String>>,
    column_index: Option<HashMap<String, usize>>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
            column_names: None,
            column_index: None,
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let converted: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        Sheet {
            data: converted,
            ..Sheet::new()
        }
    }

    /// Build a sheet from a flattened table: one named column per entry,
    /// values in row order.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::NestedColumn` if an entry still has
    /// sub-headers, and `SheetError::LengthMismatch` if the columns do not
    /// all have the same length.
    pub fn from_flat(flat: &NestedTable) -> Result<Self> {
        let mut columns: Vec<(&String, &[Option<LeafValue>])> = Vec::with_capacity(flat.len());
        for (name, node) in flat {
            match node {
                TableNode::Leaf(values) => columns.push((name, values)),
                TableNode::Composite(_) => {
                    return Err(SheetError::NestedColumn { name: name.clone() })
                }
            }
        }

        let height = columns.first().map_or(0, |(_, values)| values.len());
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != height) {
            return Err(SheetError::LengthMismatch {
                column: (*name).clone(),
                expected: height,
                actual: values.len(),
            });
        }

        let mut data = Vec::with_capacity(height + 1);
        data.push(
            columns
                .iter()
                .map(|(name, _)| CellValue::String((*name).clone()))
                .collect(),
        );
        for row in 0..height {
            data.push(
                columns
                    .iter()
                    .map(|(_, values)| CellValue::from(values[row].clone()))
                    .collect(),
            );
        }

        let mut sheet = Sheet {
            data,
            ..Sheet::new()
        };
        sheet.name_columns_by_row(0)?;
        Ok(sheet)
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of rows, header row included
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of data rows (excluding the header row once named)
    #[must_use]
    pub fn data_row_count(&self) -> usize {
        self.data.len().saturating_sub(self.data_start())
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    fn data_start(&self) -> usize {
        usize::from(self.column_names.is_some())
    }

    // ===== Cell Access =====

    /// Get a cell value by row and column index (0-based)
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.row(row)?
            .get(col)
            .ok_or(SheetError::ColumnIndexOutOfBounds {
                index: col,
                count: self.col_count(),
            })
    }

    /// Get a cell value by row index and column name
    pub fn get_by_name(&self, row: usize, col_name: &str) -> Result<&CellValue> {
        let col = self.column_index_by_name(col_name)?;
        self.get(row, col)
    }

    // ===== Row Operations =====

    /// Get an entire row by index (0-based)
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.data.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.row_count(),
        })
    }

    /// Remove the last data row, if there is one. The header row is never
    /// removed.
    pub fn drop_last_data_row(&mut self) -> Option<Vec<CellValue>> {
        if self.data_row_count() == 0 {
            return None;
        }
        self.data.pop()
    }

    // ===== Column Operations =====

    /// Get an entire column by index (0-based), header row included
    pub fn column(&self, index: usize) -> Result<Vec<CellValue>> {
        if index >= self.col_count() {
            return Err(SheetError::ColumnIndexOutOfBounds {
                index,
                count: self.col_count(),
            });
        }

        Ok(self.data.iter().map(|row| row[index].clone()).collect())
    }

    /// Get the data cells of a column by name
    pub fn column_by_name(&self, name: &str) -> Result<Vec<CellValue>> {
        let index = self.column_index_by_name(name)?;
        Ok(self.column(index)?.split_off(self.data_start()))
    }

    /// Apply a fallible function to every data cell of a column.
    ///
    /// The function receives the data row index (0-based, header
    /// excluded). The first error aborts and is returned; cells already
    /// mapped keep their new value.
    pub fn try_column_map<F>(&mut self, col_index: usize, mut f: F) -> Result<()>
    where
        F: FnMut(usize, &CellValue) -> Result<CellValue>,
    {
        if col_index >= self.col_count() {
            return Err(SheetError::ColumnIndexOutOfBounds {
                index: col_index,
                count: self.col_count(),
            });
        }

        let start = self.data_start();
        for (row_idx, row) in self.data.iter_mut().enumerate().skip(start) {
            row[col_index] = f(row_idx - start, &row[col_index])?;
        }
        Ok(())
    }

    // ===== Named Access =====

    /// Use the specified row as column headers
    ///
    /// # Errors
    ///
    /// Returns `SheetError::DuplicateColumnName` if the header row contains duplicate names.
    pub fn name_columns_by_row(&mut self, row_index: usize) -> Result<()> {
        let header_row = self.row(row_index)?;
        let names: Vec<String> = header_row.iter().map(CellValue::as_str).collect();
        self.column_index = Some(index_names(&names)?);
        self.column_names = Some(names);
        Ok(())
    }

    /// Get column names (if set)
    #[must_use]
    pub fn column_names(&self) -> Option<&Vec<String>> {
        self.column_names.as_ref()
    }

    /// Rename the column at `index`, keeping the header row in step.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::DuplicateColumnName` if another column already
    /// has the new name.
    pub fn rename_column(&mut self, index: usize, new_name: &str) -> Result<()> {
        let names = self.column_names.as_mut().ok_or_else(|| {
            SheetError::ColumnsNotNamed("Call name_columns_by_row() first".to_string())
        })?;
        let count = names.len();
        let old = names
            .get(index)
            .ok_or(SheetError::ColumnIndexOutOfBounds { index, count })?;
        if old == new_name {
            return Ok(());
        }

        let mut renamed = names.clone();
        renamed[index] = new_name.to_string();
        self.column_index = Some(index_names(&renamed)?);
        *names = renamed;
        self.data[0][index] = CellValue::String(new_name.to_string());
        Ok(())
    }

    /// Rename every column at once through `f`, keeping the header row in
    /// step.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::DuplicateColumnName` if two columns end up with
    /// the same name; the sheet is left unchanged.
    pub fn rename_columns<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&str) -> String,
    {
        let names = self.column_names.as_ref().ok_or_else(|| {
            SheetError::ColumnsNotNamed("Call name_columns_by_row() first".to_string())
        })?;
        let renamed: Vec<String> = names.iter().map(|n| f(n)).collect();
        self.column_index = Some(index_names(&renamed)?);
        for (cell, name) in self.data[0].iter_mut().zip(&renamed) {
            *cell = CellValue::String(name.clone());
        }
        self.column_names = Some(renamed);
        Ok(())
    }

    // ===== Normalization =====

    /// Parse every data cell of every column but the first as a grouped
    /// integer. Null cells stay null.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::ValueParse` for the first cell that is not an
    /// integer in `locale`.
    pub fn coerce_numeric(&mut self, locale: &NumberLocale) -> Result<()> {
        let names = self.column_names.clone().unwrap_or_default();
        for col in 1..self.col_count() {
            let column = names.get(col).cloned().unwrap_or_default();
            self.try_column_map(col, |row, cell| match cell {
                CellValue::Null | CellValue::Int(_) => Ok(cell.clone()),
                CellValue::String(text) => {
                    locale
                        .parse_int(text)
                        .map(CellValue::Int)
                        .ok_or_else(|| SheetError::ValueParse {
                            column: column.clone(),
                            row,
                            value: text.clone(),
                            locale: locale.name().to_string(),
                        })
                }
                other => Err(SheetError::ValueParse {
                    column: column.clone(),
                    row,
                    value: other.to_string(),
                    locale: locale.name().to_string(),
                }),
            })?;
        }
        Ok(())
    }

    /// Replace a compound first header such as `種類\n年齢` with its second
    /// line. A header without a line break is left as is.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::DuplicateColumnName` if the new name is
    /// already taken.
    pub fn rename_first_column_from_compound(&mut self) -> Result<()> {
        let Some(first) = self.column_names.as_ref().and_then(|n| n.first()) else {
            return Ok(());
        };
        let Some(second) = first.split('\n').nth(1) else {
            return Ok(());
        };
        let second = second.to_string();
        self.rename_column(0, &second)
    }

    /// Get the column index by name
    fn column_index_by_name(&self, name: &str) -> Result<usize> {
        self.column_index
            .as_ref()
            .ok_or_else(|| {
                SheetError::ColumnsNotNamed("Call name_columns_by_row() first".to_string())
            })?
            .get(name)
            .copied()
            .ok_or_else(|| SheetError::Parse(format!("Column not found: {name}")))
    }

    // ===== Conversion =====

    /// Convert the data rows to records keyed by column name.
    /// Returns None if columns are not named.
    #[must_use]
    pub fn to_records(&self) -> Option<Vec<IndexMap<String, CellValue>>> {
        let names = self.column_names.as_ref()?;
        Some(
            self.data
                .iter()
                .skip(1)
                .map(|row| {
                    names
                        .iter()
                        .enumerate()
                        .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or_default()))
                        .collect()
                })
                .collect(),
        )
    }

    /// Get internal data reference
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }

    /// Get mutable internal data reference
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.data
    }
}

fn index_names(names: &[String]) -> Result<HashMap<String, usize>> {
    let mut index_map = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if index_map.insert(name.clone(), i).is_some() {
            return Err(SheetError::DuplicateColumnName { name: name.clone() });
        }
    }
    Ok(index_map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(entries: Vec<(&str, Vec<Option<&str>>)>) -> NestedTable {
        entries
            .into_iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    TableNode::Leaf(v.into_iter().map(|c| c.map(LeafValue::from)).collect()),
                )
            })
            .collect()
    }

    #[test]
    fn test_from_flat_builds_named_columns() {
        let sheet = Sheet::from_flat(&flat(vec![
            ("Prefecture", vec![Some("Hokkaido"), Some("Aomori")]),
            ("Total", vec![Some("1,234"), None]),
        ]))
        .unwrap();

        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.data_row_count(), 2);
        assert_eq!(
            sheet.column_names().unwrap(),
            &vec!["Prefecture".to_string(), "Total".to_string()]
        );
        assert_eq!(sheet.get(1, 1).unwrap(), &CellValue::from("1,234"));
        assert!(sheet.get(2, 1).unwrap().is_null());
    }

    #[test]
    fn test_from_flat_rejects_ragged_columns() {
        let result = Sheet::from_flat(&flat(vec![
            ("A", vec![Some("1"), Some("2")]),
            ("B", vec![Some("3")]),
        ]));
        assert!(matches!(
            result,
            Err(SheetError::LengthMismatch { column, expected: 2, actual: 1 }) if column == "B"
        ));
    }

    #[test]
    fn test_from_flat_rejects_nested_column() {
        let mut nested = NestedTable::new();
        nested.insert(
            "A".to_string(),
            TableNode::Composite(flat(vec![("x", vec![Some("1")])])),
        );
        assert!(matches!(
            Sheet::from_flat(&nested),
            Err(SheetError::NestedColumn { name }) if name == "A"
        ));
    }

    #[test]
    fn test_rename_column_updates_header() {
        let mut sheet = Sheet::from_flat(&flat(vec![
            ("a", vec![Some("1")]),
            ("b", vec![Some("2")]),
        ]))
        .unwrap();

        sheet.rename_column(0, "first").unwrap();
        assert_eq!(sheet.get(0, 0).unwrap(), &CellValue::from("first"));
        assert_eq!(
            sheet.get_by_name(1, "first").unwrap(),
            &CellValue::from("1")
        );

        let dup = sheet.rename_column(0, "b");
        assert!(matches!(dup, Err(SheetError::DuplicateColumnName { .. })));
        assert_eq!(sheet.column_names().unwrap()[0], "first");
    }

    #[test]
    fn test_try_column_map_skips_header() {
        let mut sheet = Sheet::from_flat(&flat(vec![("n", vec![Some("1"), Some("2")])])).unwrap();
        sheet
            .try_column_map(0, |_, cell| Ok(CellValue::Int(cell.as_int().unwrap() * 10)))
            .unwrap();
        assert_eq!(
            sheet.column_by_name("n").unwrap(),
            vec![CellValue::Int(10), CellValue::Int(20)]
        );
        assert_eq!(sheet.get(0, 0).unwrap(), &CellValue::from("n"));
    }

    #[test]
    fn test_drop_last_data_row_keeps_header() {
        let mut sheet = Sheet::from_flat(&flat(vec![("n", vec![Some("1")])])).unwrap();
        assert!(sheet.drop_last_data_row().is_some());
        assert!(sheet.drop_last_data_row().is_none());
        assert_eq!(sheet.row_count(), 1);
    }

    #[test]
    fn test_to_records() {
        let sheet = Sheet::from_flat(&flat(vec![
            ("name", vec![Some("Alice")]),
            ("age", vec![Some("30")]),
        ]))
        .unwrap();
        let records = sheet.to_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["age"], CellValue::from("30"));
    }

    #[test]
    fn test_coerce_numeric_skips_first_column() {
        let mut sheet = Sheet::from_flat(&flat(vec![
            ("Prefecture", vec![Some("北海道"), Some("青森県")]),
            ("Total", vec![Some("1,234"), None]),
        ]))
        .unwrap();
        sheet.coerce_numeric(&NumberLocale::default()).unwrap();

        assert_eq!(sheet.get(1, 0).unwrap(), &CellValue::from("北海道"));
        assert_eq!(sheet.get(1, 1).unwrap(), &CellValue::Int(1234));
        assert!(sheet.get(2, 1).unwrap().is_null());
    }

    #[test]
    fn test_coerce_numeric_reports_bad_cell() {
        let mut sheet = Sheet::from_flat(&flat(vec![
            ("k", vec![Some("a"), Some("b")]),
            ("v", vec![Some("1"), Some("n/a")]),
        ]))
        .unwrap();
        let err = sheet.coerce_numeric(&NumberLocale::default()).unwrap_err();
        assert!(matches!(
            err,
            SheetError::ValueParse { column, row: 1, value, .. } if column == "v" && value == "n/a"
        ));
    }

    #[test]
    fn test_rename_first_column_from_compound() {
        let mut sheet = Sheet::from_flat(&flat(vec![
            ("種類\n年齢", vec![Some("16")]),
            ("合計", vec![Some("5")]),
        ]))
        .unwrap();
        sheet.rename_first_column_from_compound().unwrap();
        assert_eq!(sheet.column_names().unwrap()[0], "年齢");

        sheet.rename_first_column_from_compound().unwrap();
        assert_eq!(sheet.column_names().unwrap()[0], "年齢");
    }

    #[test]
    fn test_rename_columns_rejects_collision() {
        let mut sheet = Sheet::from_flat(&flat(vec![
            ("a", vec![Some("1")]),
            ("b", vec![Some("2")]),
        ]))
        .unwrap();
        let result = sheet.rename_columns(|_| "same".to_string());
        assert!(matches!(result, Err(SheetError::DuplicateColumnName { .. })));
        assert_eq!(sheet.column_names().unwrap()[1], "b");
    }
}
