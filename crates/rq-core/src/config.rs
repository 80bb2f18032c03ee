//! Configuration handling for relq.yml

use crate::error::{CoreError, CoreResult};
use crate::query::QueryBuilder;
use crate::schema::{Database, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main configuration from relq.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database identifier used in source references (`#>{database.table}#`)
    pub database: String,

    /// Runtime identifier bound as the last pipeline stage
    pub runtime: String,

    /// Storage connection settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionConfig>,

    /// Tables available to queries, in declaration order
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// Storage connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Path to the database file
    pub path: PathBuf,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for relq.yml or relq.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("relq.yml");
        let yaml_path = dir.join("relq.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.database.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database cannot be empty".to_string(),
            });
        }
        if self.runtime.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "runtime cannot be empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for table in &self.tables {
            if table.name.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "table name cannot be empty".to_string(),
                });
            }
            if !seen.insert(table.name.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("table '{}' is declared more than once", table.name),
                });
            }
            table.check_unique_columns().map_err(|e| CoreError::ConfigInvalid {
                message: e.to_string(),
            })?;
        }

        Ok(())
    }

    /// The configured tables as a [`Database`]
    pub fn database(&self) -> Database {
        Database::new(self.database.clone(), self.tables.clone())
    }

    /// Look up a configured table
    pub fn table(&self, name: &str) -> CoreResult<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| CoreError::UnknownTable {
                table: name.to_string(),
                database: self.database.clone(),
            })
    }

    /// Open a query session on a configured table
    pub fn query(&self, table: &str) -> CoreResult<QueryBuilder> {
        let table = self.table(table)?;
        Ok(QueryBuilder::from_db(self.database.clone(), table.clone()))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
