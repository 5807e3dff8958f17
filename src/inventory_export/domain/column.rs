//! Supported CSV columns and the rules for resolving them against a record.

use serde_json::{Map, Value};

/// Prefix shared by every per-vulnerability column
pub const VULNERABILITY_PREFIX: &str = "vuln_";

/// Container-level columns, resolved as dotted/indexed paths into the record
const CONTAINER_COLUMNS: &[&str] = &[
    // Container identity & status
    "containerId",
    "uuid",
    "name",
    "state",
    "ipv4",
    "ipv6",
    "created",
    "updated",
    "stateChanged",
    "riskScore",
    "qdsSeverity",
    "maxQdsScore",
    "imageId",
    "imageSha",
    "imageUuid",
    "customerUuid",
    "privileged",
    "isRoot",
    "isVulnPropagated",
    "source",
    "sensorUuid",
    // Host / cluster
    "host.sensorUuid",
    "host.hostname",
    "host.ipAddress",
    "cluster.name",
    "cluster.uid",
    "cluster.version",
    "cluster.k8s.pod.name",
    "cluster.k8s.pod.namespace",
    "cluster.k8s.pod.uuid",
    "cluster.k8s.pod.controller[0].name",
    "cluster.k8s.pod.controller[0].type",
    "hostArchitecture",
    // Runtime context
    "environment",
    "command",
    "arguments",
];

/// Per-vulnerability fields, in default column order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VulnerabilityField {
    Qid,
    FirstFound,
    LastFound,
    TypeDetected,
    ScanTypes,
    SoftwareNames,
    SoftwareVersions,
    SoftwareFixVersions,
    SoftwarePackagePaths,
}

impl VulnerabilityField {
    pub const ALL: [VulnerabilityField; 9] = [
        VulnerabilityField::Qid,
        VulnerabilityField::FirstFound,
        VulnerabilityField::LastFound,
        VulnerabilityField::TypeDetected,
        VulnerabilityField::ScanTypes,
        VulnerabilityField::SoftwareNames,
        VulnerabilityField::SoftwareVersions,
        VulnerabilityField::SoftwareFixVersions,
        VulnerabilityField::SoftwarePackagePaths,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            VulnerabilityField::Qid => "vuln_qid",
            VulnerabilityField::FirstFound => "vuln_firstFound",
            VulnerabilityField::LastFound => "vuln_lastFound",
            VulnerabilityField::TypeDetected => "vuln_typeDetected",
            VulnerabilityField::ScanTypes => "vuln_scanTypes",
            VulnerabilityField::SoftwareNames => "vuln_software_names",
            VulnerabilityField::SoftwareVersions => "vuln_software_versions",
            VulnerabilityField::SoftwareFixVersions => "vuln_software_fixVersions",
            VulnerabilityField::SoftwarePackagePaths => "vuln_software_packagePaths",
        }
    }

    fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }
}

/// How a requested column obtains its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Container(FieldPath),
    Vulnerability(VulnerabilityField),
    /// Not in the registry: always blank
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
}

impl Column {
    /// Looks the name up in the registry. Unknown names are accepted and
    /// become permanently blank columns.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = if CONTAINER_COLUMNS.contains(&name.as_str()) {
            ColumnKind::Container(FieldPath::parse(&name))
        } else if let Some(field) = VulnerabilityField::from_column_name(&name) {
            ColumnKind::Vulnerability(field)
        } else {
            ColumnKind::Unsupported
        };
        Self { name, kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self.kind, ColumnKind::Unsupported)
    }

    /// Any column named `vuln_*` asks for one row per vulnerability,
    /// even when the name itself is not in the registry.
    pub fn is_vulnerability_column(&self) -> bool {
        self.name.starts_with(VULNERABILITY_PREFIX)
    }
}

/// The ordered list of columns written to CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: names.into_iter().map(Column::new).collect(),
        }
    }

    /// Parses a comma-separated list, trimming names and dropping empty entries.
    /// Returns `None` when nothing usable remains.
    pub fn parse_list(list: &str) -> Option<Self> {
        let names: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(Self::new(names))
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn wants_vulnerability_rows(&self) -> bool {
        self.columns.iter().any(Column::is_vulnerability_column)
    }

    pub fn unsupported_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !c.is_supported())
            .map(Column::name)
            .collect()
    }
}

impl Default for ColumnSet {
    /// Every supported column, container fields first
    fn default() -> Self {
        Self::new(
            CONTAINER_COLUMNS
                .iter()
                .copied()
                .chain(VulnerabilityField::ALL.iter().map(|f| f.column_name())),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A dotted path with optional list indices, e.g. `cluster.k8s.pod.controller[0].name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Parses the path. A malformed index is kept as a key that can never
    /// match, so resolution yields nothing instead of failing.
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        for part in path.split('.') {
            let mut pieces = part.split('[');
            let key = pieces.next().unwrap_or_default();
            if !key.is_empty() {
                segments.push(PathSegment::Key(key.to_string()));
            }
            for index in pieces {
                match index.strip_suffix(']').and_then(|i| i.parse().ok()) {
                    Some(i) => segments.push(PathSegment::Index(i)),
                    None => segments.push(PathSegment::Key(format!("[{}", index))),
                }
            }
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Walks the path from a record's top-level fields; any missing key,
    /// out-of-range index or type mismatch yields `None`.
    pub fn resolve<'a>(&self, root: &'a Map<String, Value>) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let start = match first {
            PathSegment::Key(key) => root.get(key)?,
            PathSegment::Index(_) => return None,
        };
        rest.iter()
            .try_fold(start, |current, segment| match segment {
                PathSegment::Key(key) => current.as_object()?.get(key),
                PathSegment::Index(i) => current.as_array()?.get(*i),
            })
    }
}
