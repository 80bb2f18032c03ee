//! Storage declaration generator
//!
//! Produces the runtime, connection and relational database declarations an
//! execution engine needs before it can run pure relation queries against a
//! DuckDB file.

use std::path::{Path, PathBuf};

use rq_core::{Column, ColumnType, Config, Database, Table};

use crate::error::{DialectError, DialectResult};

/// Connection name used when none is given
pub const DEFAULT_CONNECTION: &str = "local::DuckDuckConnection";

/// Storage column type for a declared column
pub fn storage_type(column: &Column) -> DialectResult<&'static str> {
    match column.column_type {
        ColumnType::String => Ok("VARCHAR(0)"),
        ColumnType::Integer => Ok("BIGINT"),
        ColumnType::Float => Ok("DOUBLE"),
        ColumnType::Date => Ok("DATE"),
        ColumnType::Timestamp => Ok("TIMESTAMP"),
        ColumnType::Boolean | ColumnType::Unknown | ColumnType::Other(_) => {
            Err(DialectError::TypeMapping {
                column: column.name.clone(),
                column_type: column.column_type.to_string(),
            })
        }
    }
}

/// DuckDB-backed storage declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuckDbStorage {
    path: PathBuf,
    connection: String,
}

impl DuckDbStorage {
    /// Declarations for the DuckDB file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            connection: DEFAULT_CONNECTION.to_string(),
        }
    }

    /// Use a different connection name
    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = connection.into();
        self
    }

    /// Storage from the `connection` section of a config, if present
    pub fn from_config(config: &Config) -> Option<Self> {
        config.connection.as_ref().map(|c| Self::new(c.path.clone()))
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `###Runtime` block binding `database` to this connection
    pub fn runtime_block(&self, runtime: &str, database: &str) -> String {
        format!(
            "###Runtime\n\
             Runtime {runtime}\n\
             {{\n\
             \x20 mappings:\n\
             \x20 [\n\
             \x20 ];\n\
             \x20 connections:\n\
             \x20 [\n\
             \x20   {database}:\n\
             \x20   [\n\
             \x20     connection: {connection}\n\
             \x20   ]\n\
             \x20 ];\n\
             }}\n",
            connection = self.connection,
        )
    }

    /// `###Connection` block for the DuckDB file
    pub fn connection_block(&self) -> String {
        format!(
            "###Connection\n\
             RelationalDatabaseConnection {connection}\n\
             {{\n\
             \x20 type: DuckDB;\n\
             \x20 specification: DuckDB\n\
             \x20 {{\n\
             \x20   path: '{path}';\n\
             \x20 }};\n\
             \x20 auth: Test;\n\
             }}\n",
            connection = self.connection,
            path = self.path.display(),
        )
    }

    /// `###Relational` block declaring every table of `database`
    pub fn database_block(&self, database: &Database) -> DialectResult<String> {
        let tables = database
            .tables
            .iter()
            .map(table_declaration)
            .collect::<DialectResult<Vec<_>>>()?;
        Ok(format!(
            "###Relational\nDatabase {}\n(\n{}\n)\n",
            database.name,
            tables.join("\n\n")
        ))
    }

    /// All three blocks, separated by blank lines
    pub fn generate(&self, runtime: &str, database: &Database) -> DialectResult<String> {
        let relational = self.database_block(database)?;
        Ok(format!(
            "{}\n{}\n{}",
            self.runtime_block(runtime, &database.name),
            self.connection_block(),
            relational
        ))
    }
}

fn table_declaration(table: &Table) -> DialectResult<String> {
    let columns = table
        .columns
        .iter()
        .map(|col| -> DialectResult<String> {
            Ok(format!("    {} {}", col.name, storage_type(col)?))
        })
        .collect::<DialectResult<Vec<_>>>()?;
    Ok(format!(
        "  Table {}\n  (\n{}\n  )",
        table.name,
        columns.join(",\n")
    ))
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
