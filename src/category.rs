//! Category naming and record type descriptors.
//!
//! A part category is identified by two interchangeable names:
//! - the file-stem form used for data files and table names (`graphics-card`)
//! - the type-name form used by the generated type registry (`GraphicsCard`)
//!
//! Record types are emitted by the external schema compiler, one per
//! category, and are read-only afterwards.

use serde::{Deserialize, Serialize};

/// Convert a category file stem (`graphics-card` or `graphics_card`) to its
/// type-name form (`GraphicsCard`).
pub fn class_name_for(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert a type name (`GraphicsCard`) back to its file-stem form
/// (`graphics-card`). Inverse of [`class_name_for`] for well-formed names.
pub fn file_stem_for(class_name: &str) -> String {
    let mut stem = String::with_capacity(class_name.len() + 4);
    for (i, c) in class_name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                stem.push('-');
            }
            stem.extend(c.to_lowercase());
        } else {
            stem.push(c);
        }
    }
    stem
}

/// A single field of a generated record type, carrying the compiler-emitted
/// semantic type annotation (`str`, `Optional[int]`, `List[str]`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub annotation: String,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: annotation.into(),
        }
    }

    /// Whether the annotation admits a null value (`Optional[...]` or a
    /// `Union[..., None]`).
    pub fn is_optional(&self) -> bool {
        self.annotation.contains("Optional") || self.annotation.contains("None")
    }
}

/// A generated record type: one per category, with a fixed ordered field
/// list. Field order is significant and flows through to column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    /// Type-name form (`GraphicsCard`)
    pub class_name: String,
    /// File-stem form (`graphics-card`), also the table name
    pub stem: String,
    /// Declared fields in declaration order
    pub fields: Vec<FieldDef>,
}

impl RecordType {
    /// Create a record type from a category file stem.
    pub fn new(stem: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        let stem = stem.into();
        Self {
            class_name: class_name_for(&stem),
            stem,
            fields,
        }
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
