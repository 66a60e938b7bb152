//! Database build orchestration.
//!
//! Drives the whole rebuild: delete the old database file, synthesize one
//! table per resolvable category, then populate every table from its data
//! file. Two commit points bound the transactions: one after schema
//! creation, one after population.

use std::path::Path;

use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};
use serde_json::Value;

use crate::columns::{TableDescriptor, infer_columns};
use crate::config::Config;
use crate::loader::{load_records, locate_data_file};
use crate::registry::TypeRegistry;
use crate::{Error, Result};

/// Owns the database connection for the lifetime of one rebuild.
pub struct DatabaseBuilder {
    conn: Connection,
    tables: Vec<TableDescriptor>,
}

impl DatabaseBuilder {
    /// Delete any pre-existing database file and open a fresh one.
    pub fn create(db_path: &Path) -> Result<Self> {
        if db_path.is_file() {
            tracing::info!("removing existing database {}", db_path.display());
            std::fs::remove_file(db_path)?;
        }
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn,
            tables: Vec::new(),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            tables: Vec::new(),
        })
    }

    /// Tables created so far, in creation order
    pub fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }

    /// Create one table per resolvable category, in registry order.
    ///
    /// A category with no generated type is skipped entirely; no table is
    /// created for it and the run continues.
    pub fn build_schema(&mut self, registry: &TypeRegistry) -> Result<()> {
        self.begin()?;
        for category in registry.categories() {
            let Some(record) = registry.resolve(category) else {
                tracing::warn!("no generated type for category {}, skipping", category);
                continue;
            };
            let table = TableDescriptor {
                name: record.stem.clone(),
                columns: infer_columns(record),
            };
            let sql = table.create_sql();
            tracing::debug!("{}", sql);
            self.conn.execute(&sql, [])?;
            self.tables.push(table);
        }
        self.commit()?;
        Ok(())
    }

    /// Populate every created table from its data file.
    ///
    /// A table whose data file cannot be located stays empty; a loaded
    /// record that does not match its record type aborts the run. Returns
    /// the number of inserted rows.
    pub fn populate(&self, registry: &TypeRegistry, base_folder: &Path) -> Result<usize> {
        let mut total = 0;
        self.begin()?;
        for table in &self.tables {
            let Some(record_type) = registry.resolve(&table.name) else {
                continue;
            };
            let Some(data_file) = locate_data_file(&table.name, base_folder) else {
                tracing::info!("no data file for table {}, leaving it empty", table.name);
                continue;
            };

            let insert_sql = table.insert_sql();
            tracing::debug!("{}", insert_sql);
            let mut stmt = self.conn.prepare(&insert_sql)?;
            for record in load_records(&data_file, record_type)? {
                let values = table
                    .columns
                    .iter()
                    .map(|col| to_sql_value(record.get(&col.name)))
                    .collect::<Result<Vec<_>>>()?;
                stmt.execute(params_from_iter(values))?;
                total += 1;
            }
        }
        self.commit()?;
        Ok(total)
    }

    /// Release the database connection.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Storage(e))
    }

    fn begin(&self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }
}

/// Convert one loaded JSON value into a bindable SQL value. List-shaped
/// values are stored as serialized JSON text.
fn to_sql_value(value: &Value) -> Result<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Integer(*b as i64)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(SqlValue::Integer(i)),
            None => Ok(SqlValue::Real(n.as_f64().unwrap_or(0.0))),
        },
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => Ok(SqlValue::Text(serde_json::to_string(value)?)),
    }
}

/// Statistics from one database rebuild
#[derive(Debug, Clone)]
pub struct BuildStats {
    pub tables: usize,
    pub rows: usize,
    pub skipped_categories: usize,
}

impl std::fmt::Display for BuildStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Build summary:")?;
        writeln!(f, "  Tables: {}", self.tables)?;
        writeln!(f, "  Rows: {}", self.rows)?;
        writeln!(f, "  Skipped categories: {}", self.skipped_categories)
    }
}

/// Run a full rebuild: `Init -> SchemaBuilt -> Populated -> Closed`.
pub fn build_database(config: &Config, registry: &TypeRegistry) -> Result<BuildStats> {
    let mut builder = DatabaseBuilder::create(&config.db_path())?;
    builder.build_schema(registry)?;
    let rows = builder.populate(registry, &config.base_folder)?;
    let tables = builder.tables().len();
    let stats = BuildStats {
        tables,
        rows,
        skipped_categories: registry.categories().count() - tables,
    };
    builder.close()?;
    Ok(stats)
}
