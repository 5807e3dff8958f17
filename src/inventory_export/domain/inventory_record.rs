use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One container as returned by the inventory endpoint.
///
/// The record is kept as the raw JSON object so the weekly JSON artifact is a
/// faithful copy of the API response, whatever fields the vendor adds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryRecord(Map<String, Value>);

impl InventoryRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn container_id(&self) -> Option<&str> {
        self.0.get("containerId").and_then(Value::as_str)
    }

    /// Vulnerability entries; empty when the field is missing, null or not a list.
    pub fn vulnerabilities(&self) -> &[Value] {
        match self.0.get("vulnerabilities") {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for InventoryRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> InventoryRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_identity_accessors() {
        let rec = record(json!({"containerId": "abc123"}));
        assert_eq!(rec.container_id(), Some("abc123"));

        let anonymous = record(json!({"name": "nginx"}));
        assert_eq!(anonymous.container_id(), None);
    }

    #[test]
    fn test_vulnerabilities_tolerates_odd_shapes() {
        assert_eq!(record(json!({})).vulnerabilities().len(), 0);
        assert_eq!(record(json!({"vulnerabilities": null})).vulnerabilities().len(), 0);
        assert_eq!(record(json!({"vulnerabilities": "n/a"})).vulnerabilities().len(), 0);
        assert_eq!(
            record(json!({"vulnerabilities": [{"qid": 1}, {"qid": 2}]}))
                .vulnerabilities()
                .len(),
            2
        );
    }

    #[test]
    fn test_serializes_verbatim() {
        let original = json!({"containerId": "c1", "host": {"hostname": "node-1"}, "vulnerabilities": []});
        let rec = record(original.clone());
        assert_eq!(serde_json::to_value(&rec).unwrap(), original);
        assert_eq!(rec.fields().get("host"), original.get("host"));
    }

    #[test]
    fn test_rejects_non_object() {
        let result: Result<InventoryRecord, _> = serde_json::from_value(json!([1, 2, 3]));
        assert!(result.is_err());
    }
}
