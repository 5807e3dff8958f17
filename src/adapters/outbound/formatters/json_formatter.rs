use crate::inventory_export::domain::InventoryRecord;
use crate::shared::Result;

/// JsonFormatter adapter rendering a window's records as the JSON artifact
///
/// Output is a pretty-printed array with two-space indentation; an empty
/// window renders as `[]`.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, records: &[InventoryRecord]) -> Result<String> {
        let mut output = serde_json::to_string_pretty(records)?;
        output.push('\n');
        Ok(output)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_window() {
        assert_eq!(JsonFormatter::new().format(&[]).unwrap(), "[]\n");
    }

    #[test]
    fn test_records_round_trip_verbatim() {
        let record: InventoryRecord =
            serde_json::from_value(json!({"containerId": "c-1", "vulnerabilities": [{"qid": 1}]}))
                .unwrap();
        let output = JsonFormatter::new().format(&[record.clone()]).unwrap();
        assert!(output.starts_with("[\n  {"));

        let parsed: Vec<InventoryRecord> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, vec![record]);
    }
}
