//! Generated type registry.
//!
//! Stage (a) writes one `<stem>.type.json` definition per category plus a
//! `pcparts.json` index listing the generated class names. The registry
//! loads those manifests once into an explicit map; all later lookups are
//! plain data access, never dynamic dispatch by name.

use std::collections::HashMap;
use std::path::Path;

use crate::Result;
use crate::category::{RecordType, class_name_for, file_stem_for};

/// Index manifest listing known class names in generation order
pub const INDEX_FILE: &str = "pcparts.json";

/// File name of the per-category type definition manifest
pub fn definition_file(stem: &str) -> String {
    format!("{}.type.json", stem)
}

/// Registry of generated record types, keyed by type name.
///
/// The category enumeration order is the index manifest order and stays
/// fixed across runs. A category may be listed in the index without having
/// a loadable definition; resolving it returns `None` and callers skip it.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    order: Vec<String>,
    types: HashMap<String, RecordType>,
}

impl TypeRegistry {
    /// Whether a registry manifest exists under `types_dir`
    pub fn manifest_exists(types_dir: &Path) -> bool {
        types_dir.join(INDEX_FILE).is_file()
    }

    /// Load the registry from the manifest directory.
    pub fn load(types_dir: &Path) -> Result<Self> {
        let index_raw = std::fs::read_to_string(types_dir.join(INDEX_FILE))?;
        let index: Vec<String> = serde_json::from_str(&index_raw)?;

        let mut registry = Self::default();
        for class_name in index {
            let def_path = types_dir.join(definition_file(&file_stem_for(&class_name)));
            match std::fs::read_to_string(&def_path) {
                Ok(raw) => {
                    let record: RecordType = serde_json::from_str(&raw)?;
                    registry.insert(record);
                }
                Err(e) => {
                    tracing::warn!(
                        "no type definition for {} ({}): {}",
                        class_name,
                        def_path.display(),
                        e
                    );
                    registry.insert_listed(class_name);
                }
            }
        }
        tracing::debug!("loaded {} record types", registry.types.len());
        Ok(registry)
    }

    /// Register a record type
    pub fn insert(&mut self, record: RecordType) {
        self.order.push(record.class_name.clone());
        self.types.insert(record.class_name.clone(), record);
    }

    /// List a category without a record type. Such categories fail to
    /// resolve and are skipped during the build.
    pub fn insert_listed(&mut self, class_name: impl Into<String>) {
        self.order.push(class_name.into());
    }

    /// Resolve a category name, in either naming form, to its record type.
    ///
    /// Names containing separators are normalized to type-name form first;
    /// a single-word stem (`cpu`) is retried in normalized form after a
    /// direct miss. `None` means the category has no generated type;
    /// callers skip it.
    pub fn resolve(&self, name: &str) -> Option<&RecordType> {
        if name.contains('_') || name.contains('-') {
            let class_name = class_name_for(name);
            tracing::warn!("{} is a file stem, assuming {}", name, class_name);
            self.types.get(&class_name)
        } else {
            self.types
                .get(name)
                .or_else(|| self.types.get(&class_name_for(name)))
        }
    }

    /// Known category class names, in fixed enumeration order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
