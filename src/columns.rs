//! Column kind inference and table descriptors.
//!
//! Maps generated field annotations to SQLite storage classes and renders
//! the CREATE TABLE / INSERT statements from one shared ordered column list,
//! so the schema and the value binding can never disagree on column order.

use crate::category::RecordType;

/// Storage column kinds. List-typed fields always map to [`ColumnKind::Text`]
/// and are stored as serialized JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Text,
    Integer,
    Boolean,
    Blob,
}

impl ColumnKind {
    /// Get the SQL type keyword for this column kind
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnKind::Text => "TEXT",
            ColumnKind::Integer => "INTEGER",
            ColumnKind::Boolean => "BOOLEAN",
            ColumnKind::Blob => "BLOB",
        }
    }

    /// Classify a field annotation into a storage column kind.
    ///
    /// Nested collections are always stored as serialized text regardless of
    /// element type; this is a deliberate simplification, not a general type
    /// mapper. Unrecognized annotations fall back to BLOB.
    pub fn from_annotation(annotation: &str) -> Self {
        if annotation.contains("List") || annotation.contains("list[") {
            return ColumnKind::Text;
        }
        let inner = strip_wrappers(annotation);
        if inner.contains("str") {
            ColumnKind::Text
        } else if inner.contains("int") || inner.contains("float") {
            ColumnKind::Integer
        } else if inner.contains("bool") {
            ColumnKind::Boolean
        } else {
            ColumnKind::Blob
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// Strip `Optional[...]` / `Union[...]` wrapping to expose the inner type
/// string, e.g. `Optional[Union[int, str]]` -> `int, str`.
fn strip_wrappers(annotation: &str) -> &str {
    let mut s = annotation.trim();
    s = s.strip_prefix("typing.").unwrap_or(s);
    while let Some(rest) = s
        .strip_prefix("Optional[")
        .or_else(|| s.strip_prefix("Union["))
    {
        s = rest.strip_suffix(']').unwrap_or(rest);
    }
    s
}

/// One column of a synthesized table: name plus inferred storage kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// A synthesized table: name (the category file stem) and its ordered
/// columns. Both the CREATE TABLE body and the INSERT column list render
/// from this one list, and value extraction zips against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

impl TableDescriptor {
    /// Render the CREATE TABLE statement for this table
    pub fn create_sql(&self) -> String {
        let defs: Vec<String> = self
            .columns
            .iter()
            .map(|col| format!("{} {}", col.name, col.kind.as_sql()))
            .collect();
        format!("CREATE TABLE '{}' ({})", self.name, defs.join(", "))
    }

    /// Render the parameterized INSERT statement: bare column names, one
    /// placeholder per column
    pub fn insert_sql(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(|col| col.name.as_str()).collect();
        let placeholders: Vec<String> = (1..=self.columns.len())
            .map(|i| format!("?{}", i))
            .collect();
        format!(
            "INSERT INTO '{}' ({}) VALUES ({})",
            self.name,
            names.join(", "),
            placeholders.join(", ")
        )
    }
}

/// Infer the ordered column list for a record type. Output preserves field
/// declaration order.
pub fn infer_columns(record: &RecordType) -> Vec<ColumnSpec> {
    record
        .fields
        .iter()
        .map(|field| ColumnSpec {
            name: field.name.clone(),
            kind: ColumnKind::from_annotation(&field.annotation),
        })
        .collect()
}
