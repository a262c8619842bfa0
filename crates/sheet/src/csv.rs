use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::Sheet;
use std::io::Write;

impl Sheet {
    /// Write the sheet to a writer as CSV. Null cells are written as empty
    /// fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);

        for row in self.data() {
            let record: Vec<String> = row.iter().map(CellValue::as_str).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Convert the sheet to a CSV string
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
