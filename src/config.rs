//! Base folder configuration.
//!
//! The tool works out of one of two fixed base folders (a staging area and a
//! production area). The choice is made once at startup and threaded into
//! every component that needs a path.

use std::path::{Path, PathBuf};

/// The two recognized base data folders, staging first.
pub const BASE_FOLDERS: [&str; 2] = ["data-staging", "data"];

/// Database file name inside the base folder
pub const DB_FILE_NAME: &str = "pc_parts.db3";

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub base_folder: PathBuf,
}

impl Config {
    /// Use `base_folder` if it exists on disk, otherwise fall back to the
    /// alternate fixed folder with a warning.
    pub fn new(base_folder: &str) -> Self {
        if Path::new(base_folder).is_dir() {
            return Self {
                base_folder: PathBuf::from(base_folder),
            };
        }
        let other = BASE_FOLDERS
            .iter()
            .find(|f| **f != base_folder)
            .copied()
            .unwrap_or(BASE_FOLDERS[1]);
        tracing::warn!("{} does not exist, using {} instead", base_folder, other);
        Self {
            base_folder: PathBuf::from(other),
        }
    }

    /// Build a config from an already-validated path (tests, callers that
    /// manage their own directories).
    pub fn at(base_folder: impl Into<PathBuf>) -> Self {
        Self {
            base_folder: base_folder.into(),
        }
    }

    /// Default base folder: the staging area if it exists, else production.
    pub fn default_base_folder() -> &'static str {
        if Path::new(BASE_FOLDERS[0]).is_dir() {
            BASE_FOLDERS[0]
        } else {
            BASE_FOLDERS[1]
        }
    }

    /// Path of the output database file
    pub fn db_path(&self) -> PathBuf {
        self.base_folder.join(DB_FILE_NAME)
    }

    /// Directory holding the JSON schema and data files
    pub fn json_dir(&self) -> PathBuf {
        self.base_folder.join("json")
    }

    /// Directory holding the generated type definitions
    pub fn types_dir(&self) -> PathBuf {
        self.base_folder.join("types")
    }
}
