use super::column::ColumnSet;

/// One CSV row: a value per column, in column-set order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlatRow {
    cells: Vec<String>,
}

impl FlatRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Rows produced for one window together with the columns they follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTable {
    columns: ColumnSet,
    rows: Vec<FlatRow>,
}

impl FlatTable {
    pub fn new(columns: ColumnSet, rows: Vec<FlatRow>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Value of `column` in row `row`; `None` when either is out of range.
    /// With duplicate column names the first occurrence wins.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.names().iter().position(|name| *name == column)?;
        self.rows.get(row)?.cells.get(index).map(String::as_str)
    }

    /// All values of one column, top to bottom
    pub fn column_values(&self, column: &str) -> Vec<&str> {
        (0..self.rows.len())
            .filter_map(|row| self.value(row, column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_lookup() {
        let table = FlatTable::new(
            ColumnSet::new(["containerId", "vuln_qid"]),
            vec![
                FlatRow::new(vec!["c1".into(), "100".into()]),
                FlatRow::new(vec!["c1".into(), "200".into()]),
            ],
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.value(1, "vuln_qid"), Some("200"));
        assert_eq!(table.value(2, "vuln_qid"), None);
        assert_eq!(table.value(0, "missing"), None);
        assert_eq!(table.column_values("containerId"), vec!["c1", "c1"]);
    }

    #[test]
    fn test_empty_table() {
        let table = FlatTable::new(ColumnSet::default(), vec![]);
        assert!(table.is_empty());
        assert!(table.column_values("containerId").is_empty());
    }
}
