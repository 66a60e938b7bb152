//! Data file location and record loading.
//!
//! Data files are JSON arrays of objects, one file per category, named by
//! the category's hyphenated file stem. A key literally named `type` is
//! renamed to `type_value` before construction; it collides with a reserved
//! identifier in the generated types.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::category::RecordType;
use crate::{Error, Result};

const RESERVED_KEY: &str = "type";
const RESERVED_RENAME: &str = "type_value";

/// Normalize a requested name to a data file name: `.json` suffix, hyphen
/// separators (data filenames never use underscores).
fn normalize_file_name(name: &str) -> String {
    let name = name.replace('_', "-");
    if name.ends_with(".json") {
        name
    } else {
        format!("{}.json", name)
    }
}

/// Find the data file for a table.
///
/// Search order: the normalized name as a direct path, then a `json/`
/// directory under the current working directory if one exists, else the
/// `json/` directory under the base folder. `None` leaves the table empty.
pub fn locate_data_file(name: &str, base_folder: &Path) -> Option<PathBuf> {
    let file_name = normalize_file_name(name);

    let direct = PathBuf::from(&file_name);
    if direct.is_file() {
        return Some(direct);
    }

    let json_dir = if Path::new("json").is_dir() {
        PathBuf::from("json")
    } else {
        base_folder.join("json")
    };
    let candidate = json_dir.join(&file_name);
    candidate.is_file().then_some(candidate)
}

/// One loaded data row, values keyed by record field name
#[derive(Debug, Clone)]
pub struct PartRecord {
    values: Map<String, Value>,
}

impl PartRecord {
    /// Get a field value; absent optional fields read as null
    pub fn get(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&Value::Null)
    }
}

/// Load a data file into part records, keyword-matching JSON keys to the
/// record type's fields.
///
/// A key not declared on the record type, or a missing non-optional field,
/// is a construction error; data/schema mismatch is fatal for this file.
pub fn load_records(path: &Path, record_type: &RecordType) -> Result<Vec<PartRecord>> {
    let contents = std::fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&contents)?;
    let Value::Array(items) = parsed else {
        return Err(Error::MalformedDataFile(path.display().to_string()));
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(mut object) = item else {
            return Err(Error::MalformedDataFile(path.display().to_string()));
        };

        if let Some(value) = object.remove(RESERVED_KEY) {
            object.insert(RESERVED_RENAME.to_string(), value);
        }

        for key in object.keys() {
            if record_type.field(key).is_none() {
                return Err(Error::Construction {
                    file: path.display().to_string(),
                    message: format!("unexpected field '{}' for {}", key, record_type.class_name),
                });
            }
        }
        for field in &record_type.fields {
            if !object.contains_key(&field.name) {
                if field.is_optional() {
                    object.insert(field.name.clone(), Value::Null);
                } else {
                    return Err(Error::Construction {
                        file: path.display().to_string(),
                        message: format!(
                            "missing field '{}' for {}",
                            field.name, record_type.class_name
                        ),
                    });
                }
            }
        }

        records.push(PartRecord { values: object });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::FieldDef;

    fn memory_type() -> RecordType {
        RecordType::new(
            "memory",
            vec![
                FieldDef::new("name", "str"),
                FieldDef::new("type_value", "str"),
                FieldDef::new("speed", "Optional[int]"),
            ],
        )
    }

    fn write_data(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_normalize_file_name() {
        assert_eq!(normalize_file_name("graphics_card"), "graphics-card.json");
        assert_eq!(normalize_file_name("cpu.json"), "cpu.json");
        assert_eq!(normalize_file_name("case-fan"), "case-fan.json");
    }

    #[test]
    fn test_locate_in_base_json_dir() {
        let dir = tempfile::tempdir().unwrap();
        let json_dir = dir.path().join("json");
        std::fs::create_dir(&json_dir).unwrap();
        write_data(&json_dir, "graphics-card.json", "[]");

        let found = locate_data_file("graphics_card", dir.path()).unwrap();
        assert_eq!(found, json_dir.join("graphics-card.json"));
    }

    #[test]
    fn test_locate_direct_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_data(dir.path(), "cpu.json", "[]");

        let found = locate_data_file(path.to_str().unwrap(), Path::new("unused")).unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn test_locate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(locate_data_file("motherboard", dir.path()).is_none());
    }

    #[test]
    fn test_reserved_key_rename() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_data(
            dir.path(),
            "memory.json",
            r#"[{"name": "Fury Beast", "type": "ddr4", "speed": 3200}]"#,
        );

        let records = load_records(&path, &memory_type()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("type_value"), "ddr4");
        assert_eq!(records[0].get("type"), &Value::Null);
    }

    #[test]
    fn test_missing_optional_field_defaults_to_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_data(
            dir.path(),
            "memory.json",
            r#"[{"name": "Fury Beast", "type": "ddr4"}]"#,
        );

        let records = load_records(&path, &memory_type()).unwrap();
        assert_eq!(records[0].get("speed"), &Value::Null);
    }

    #[test]
    fn test_unexpected_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_data(
            dir.path(),
            "memory.json",
            r#"[{"name": "Fury Beast", "type": "ddr4", "voltage": 1.35}]"#,
        );

        let err = load_records(&path, &memory_type()).unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
    }

    #[test]
    fn test_missing_required_field_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_data(dir.path(), "memory.json", r#"[{"type": "ddr4"}]"#);

        let err = load_records(&path, &memory_type()).unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
    }

    #[test]
    fn test_non_array_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_data(dir.path(), "memory.json", r#"{"name": "Fury Beast"}"#);

        let err = load_records(&path, &memory_type()).unwrap_err();
        assert!(matches!(err, Error::MalformedDataFile(_)));
    }
}
