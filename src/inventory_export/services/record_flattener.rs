use crate::inventory_export::domain::{
    ColumnKind, ColumnSet, FlatRow, FlatTable, InventoryRecord, VulnerabilityField,
};
use serde_json::{Map, Value};

/// Delimiter used when several software entries share one cell
pub const MULTI_VALUE_DELIMITER: &str = ", ";

/// RecordFlattener - turns nested inventory records into CSV rows
///
/// One row per (container, vulnerability) pair when a `vuln_*` column is
/// requested, one row per container otherwise. Values that cannot be found
/// are blank; flattening never fails.
pub struct RecordFlattener {
    columns: ColumnSet,
}

impl RecordFlattener {
    pub fn new(columns: ColumnSet) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn flatten(&self, records: &[InventoryRecord]) -> FlatTable {
        let rows = records
            .iter()
            .flat_map(|record| self.rows_for(record))
            .collect();
        FlatTable::new(self.columns.clone(), rows)
    }

    /// Rows contributed by a single record
    pub fn rows_for(&self, record: &InventoryRecord) -> Vec<FlatRow> {
        let root = record.fields();
        let vulnerabilities = record.vulnerabilities();

        if !self.columns.wants_vulnerability_rows() || vulnerabilities.is_empty() {
            return vec![self.build_row(root, None)];
        }

        vulnerabilities
            .iter()
            .map(|vuln| self.build_row(root, Some(vuln)))
            .collect()
    }

    fn build_row(
        &self,
        container: &Map<String, Value>,
        vulnerability: Option<&Value>,
    ) -> FlatRow {
        let cells = self
            .columns
            .columns()
            .iter()
            .map(|column| match column.kind() {
                ColumnKind::Container(path) => {
                    path.resolve(container).map(render_cell).unwrap_or_default()
                }
                ColumnKind::Vulnerability(field) => vulnerability
                    .map(|vuln| vulnerability_cell(vuln, *field))
                    .unwrap_or_default(),
                ColumnKind::Unsupported => String::new(),
            })
            .collect();
        FlatRow::new(cells)
    }
}

fn vulnerability_cell(vuln: &Value, field: VulnerabilityField) -> String {
    match field {
        VulnerabilityField::Qid => scalar_field(vuln, "qid"),
        VulnerabilityField::FirstFound => scalar_field(vuln, "firstFound"),
        VulnerabilityField::LastFound => scalar_field(vuln, "lastFound"),
        VulnerabilityField::TypeDetected => scalar_field(vuln, "typeDetected"),
        VulnerabilityField::ScanTypes => scan_types(vuln),
        VulnerabilityField::SoftwareNames => {
            join_software(vuln, |sw| match sw.get("name").map(render_cell) {
                Some(name) if !name.is_empty() => name,
                _ => scalar_field(sw, "software"),
            })
        }
        VulnerabilityField::SoftwareVersions => join_software(vuln, |sw| scalar_field(sw, "version")),
        VulnerabilityField::SoftwareFixVersions => {
            join_software(vuln, |sw| scalar_field(sw, "fixVersion"))
        }
        VulnerabilityField::SoftwarePackagePaths => {
            join_software(vuln, |sw| scalar_field(sw, "packagePath"))
        }
    }
}

fn scalar_field(object: &Value, key: &str) -> String {
    object.get(key).map(render_cell).unwrap_or_default()
}

/// `scanType` may be a list or a single value; blanks are dropped from lists.
fn scan_types(vuln: &Value) -> String {
    match vuln.get("scanType") {
        Some(Value::Array(items)) => items
            .iter()
            .map(render_cell)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(MULTI_VALUE_DELIMITER),
        Some(other) => render_cell(other),
        None => String::new(),
    }
}

/// One entry per software element, blanks included, so the names, versions,
/// fix versions and paths columns stay positionally aligned.
fn join_software<F>(vuln: &Value, extract: F) -> String
where
    F: Fn(&Value) -> String,
{
    match vuln.get("software") {
        Some(Value::Array(items)) => items
            .iter()
            .map(extract)
            .collect::<Vec<_>>()
            .join(MULTI_VALUE_DELIMITER),
        _ => String::new(),
    }
}

/// Renders a JSON value as a single sanitized CSV cell.
pub fn render_cell(value: &Value) -> String {
    let raw = match value {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) if items.is_empty() => return String::new(),
        Value::Object(map) if map.is_empty() => return String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    };
    sanitize_cell(&raw)
}

/// Flattens line breaks, trims, and blanks out textual nulls.
pub fn sanitize_cell(raw: &str) -> String {
    let cleaned = raw.replace(['\n', '\r'], " ");
    let trimmed = cleaned.trim();
    match trimmed {
        "None" | "null" => String::new(),
        _ => trimmed.to_string(),
    }
}
