//! JSON output for Sheet: an array of records keyed by column name.

use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use serde_json::{Map, Number, Value};
use std::io::Write;

impl Sheet {
    /// Write the sheet to a writer as JSON
    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        let records = self.to_records().ok_or_else(|| {
            SheetError::ColumnsNotNamed("Columns must be named to export as JSON".to_string())
        })?;

        let json_array: Vec<Map<String, Value>> = records
            .into_iter()
            .map(|record| {
                record
                    .into_iter()
                    .map(|(k, v)| (k, cell_to_json_value(&v)))
                    .collect()
            })
            .collect();

        let written = if pretty {
            serde_json::to_writer_pretty(writer, &json_array)
        } else {
            serde_json::to_writer(writer, &json_array)
        };
        written.map_err(|e| SheetError::Serialize(format!("JSON write error: {e}")))
    }

    /// Convert the sheet to a JSON string
    pub fn to_json_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_json(&mut buffer, false)?;
        String::from_utf8(buffer).map_err(|e| SheetError::Serialize(e.to_string()))
    }
}

fn cell_to_json_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Int(i) => Value::Number((*i).into()),
        CellValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        CellValue::String(s) => Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_string_records() {
        let mut sheet = Sheet::new();
        *sheet.data_mut() = vec![
            vec![CellValue::from("Prefecture"), CellValue::from("Total")],
            vec![CellValue::from("Hokkaido"), CellValue::Int(1234)],
            vec![CellValue::from("Aomori"), CellValue::Null],
        ];
        sheet.name_columns_by_row(0).unwrap();

        assert_eq!(
            sheet.to_json_string().unwrap(),
            r#"[{"Prefecture":"Hokkaido","Total":1234},{"Prefecture":"Aomori","Total":null}]"#
        );
    }

    #[test]
    fn test_non_ascii_is_written_verbatim() {
        let mut sheet = Sheet::from_data(vec![vec!["都道府県"], vec!["北海道"]]);
        sheet.name_columns_by_row(0).unwrap();
        assert_eq!(sheet.to_json_string().unwrap(), r#"[{"都道府県":"北海道"}]"#);
    }

    #[test]
    fn test_json_requires_named_columns() {
        let sheet = Sheet::from_data(vec![vec!["a"]]);
        assert!(matches!(
            sheet.to_json_string(),
            Err(SheetError::ColumnsNotNamed(_))
        ));
    }
}
