//! # pcpartsdb - PC part catalog to SQLite
//!
//! Two-stage offline ETL pipeline:
//! - Type generation: a thin wrapper around an external JSON-Schema-to-type
//!   compiler that produces one record type definition per part category
//! - Database build: schema-driven table synthesis and bulk insertion, where
//!   SQL column kinds are inferred from the generated field annotations
//!
//! The build stage destructively rebuilds a single SQLite file
//! (`pc_parts.db3`) with one table per resolvable category.

pub mod builder;
pub mod category;
pub mod columns;
pub mod config;
pub mod loader;
pub mod registry;
pub mod typegen;

// Re-exports for convenient access
pub use builder::DatabaseBuilder;
pub use category::{FieldDef, RecordType};
pub use columns::{ColumnKind, ColumnSpec, TableDescriptor};
pub use config::Config;
pub use registry::TypeRegistry;

/// Result type alias for pcpartsdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for pcpartsdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed data file {0}: expected a JSON array of objects")]
    MalformedDataFile(String),

    #[error("Failed to construct record from {file}: {message}")]
    Construction { file: String, message: String },

    #[error("Schema compiler failed for {0}")]
    Compiler(String),
}
