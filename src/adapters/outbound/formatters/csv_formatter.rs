use crate::inventory_export::domain::FlatTable;
use crate::shared::Result;
use csv::{QuoteStyle, WriterBuilder};

/// CsvFormatter adapter rendering flattened rows as CSV
///
/// Every field is quoted and the header follows the requested column order.
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, table: &FlatTable) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(Vec::new());

        writer.write_record(table.columns().names())?;
        for row in table.rows() {
            writer.write_record(row.cells())?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e))?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}
