//! Type generation: invoke the external schema compiler and collect the
//! registry manifest.
//!
//! The compiler itself is a black box: it takes one JSON Schema file and
//! emits one `<stem>.type.json` record type definition. This module only
//! enumerates the schema files, drives the invocations, and writes the
//! `pcparts.json` index of everything that generated successfully.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::category::class_name_for;
use crate::config::Config;
use crate::registry::{INDEX_FILE, definition_file};
use crate::{Error, Result};

/// Default external schema compiler command
pub const DEFAULT_COMPILER: &str = "pcpart-typegen";

/// Outcome of one generation run
#[derive(Debug, Default)]
pub struct GenerateStats {
    /// Class names of successfully generated categories, in generation order
    pub generated: Vec<String>,
    /// File stems of schemas the compiler failed on
    pub failed: Vec<String>,
}

/// Enumerate the JSON Schema files under a `json/` directory, sorted for a
/// stable generation order.
pub fn schema_files(json_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(json_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Run the external compiler for every schema file and write the index
/// manifest of everything that succeeded.
///
/// A compiler failure skips that schema only; the index is written when at
/// least one category generated.
pub fn generate_types(config: &Config, compiler: &str) -> Result<GenerateStats> {
    let types_dir = config.types_dir();
    if !types_dir.exists() {
        std::fs::create_dir_all(&types_dir)?;
    }

    let mut stats = GenerateStats::default();
    for schema in schema_files(&config.json_dir())? {
        let stem = schema
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        match compile_schema(compiler, &schema, &types_dir) {
            Ok(def_path) => {
                tracing::info!("generated type definition {}", def_path.display());
                stats.generated.push(class_name_for(&stem));
            }
            Err(e) => {
                tracing::error!("failed to generate types for {}: {}", schema.display(), e);
                stats.failed.push(stem);
            }
        }
    }

    if !stats.generated.is_empty() {
        let index_path = types_dir.join(INDEX_FILE);
        std::fs::write(&index_path, serde_json::to_string_pretty(&stats.generated)?)?;
        tracing::info!(
            "wrote index of {} categories to {}",
            stats.generated.len(),
            index_path.display()
        );
    }

    Ok(stats)
}

/// Invoke the compiler for one schema file. Success means a zero exit code
/// and the expected definition file on disk.
fn compile_schema(compiler: &str, schema: &Path, types_dir: &Path) -> Result<PathBuf> {
    let status = Command::new(compiler)
        .arg(schema)
        .arg("--out")
        .arg(types_dir)
        .status()?;

    let stem = schema
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let def_path = types_dir.join(definition_file(stem));
    if status.success() && def_path.is_file() {
        Ok(def_path)
    } else {
        Err(Error::Compiler(schema.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_with_schemas(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let json_dir = dir.path().join("json");
        std::fs::create_dir(&json_dir).unwrap();
        for name in names {
            std::fs::write(json_dir.join(name), "{}").unwrap();
        }
        dir
    }

    #[test]
    fn test_schema_file_enumeration() {
        let dir = base_with_schemas(&["cpu.json", "graphics-card.json", "notes.txt"]);
        let files = schema_files(&dir.path().join("json")).unwrap();
        let names: Vec<&str> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, ["cpu.json", "graphics-card.json"]);
    }

    #[test]
    fn test_compiler_without_output_is_a_failure() {
        // `true` exits zero but emits nothing, so generation must fail.
        let dir = base_with_schemas(&["cpu.json"]);
        let config = Config::at(dir.path());
        let stats = generate_types(&config, "true").unwrap();
        assert!(stats.generated.is_empty());
        assert_eq!(stats.failed, ["cpu"]);
        assert!(!dir.path().join("types").join(INDEX_FILE).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_generated_index_roundtrips_through_registry() {
        use std::os::unix::fs::PermissionsExt;

        let dir = base_with_schemas(&["cpu.json", "graphics-card.json"]);
        let stub = dir.path().join("stub-typegen");
        std::fs::write(
            &stub,
            concat!(
                "#!/bin/sh\n",
                "stem=$(basename \"$1\" .json)\n",
                "case \"$stem\" in\n",
                "  cpu) cls=Cpu ;;\n",
                "  graphics-card) cls=GraphicsCard ;;\n",
                "  *) exit 1 ;;\n",
                "esac\n",
                "printf '{\"class_name\":\"%s\",\"stem\":\"%s\",",
                "\"fields\":[{\"name\":\"name\",\"annotation\":\"str\"}]}' ",
                "\"$cls\" \"$stem\" > \"$3/$stem.type.json\"\n",
            ),
        )
        .unwrap();
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = Config::at(dir.path());
        let stats = generate_types(&config, stub.to_str().unwrap()).unwrap();
        assert_eq!(stats.generated, ["Cpu", "GraphicsCard"]);
        assert!(stats.failed.is_empty());

        let registry = crate::registry::TypeRegistry::load(&config.types_dir()).unwrap();
        let names: Vec<&str> = registry.categories().collect();
        assert_eq!(names, ["Cpu", "GraphicsCard"]);
        assert_eq!(
            registry.resolve("graphics-card").unwrap().class_name,
            "GraphicsCard"
        );
    }

    #[test]
    fn test_missing_compiler_skips_schema() {
        let dir = base_with_schemas(&["cpu.json", "memory.json"]);
        let config = Config::at(dir.path());
        let stats = generate_types(&config, "pcpartsdb-no-such-compiler").unwrap();
        assert_eq!(stats.failed, ["cpu", "memory"]);
    }
}
