//! Error types for rq-core

use thiserror::Error;

/// Core error type for relq
///
/// Query errors use the `Q` prefix; configuration and IO errors keep the
/// `E` prefix.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Q001: Malformed IR node (a required child is missing or ill-shaped)
    #[error("[Q001] Malformed {node}: {message}")]
    Structural { node: String, message: String },

    /// Q002: Column absent from the tracked schema
    #[error("[Q002] Column '{column}' not found in '{table}' at stage {stage}")]
    UnknownColumn {
        column: String,
        table: String,
        stage: String,
    },

    /// Q003: Table absent from the configured database
    #[error("[Q003] Table '{table}' not found in database '{database}'")]
    UnknownTable { table: String, database: String },

    /// Q004: Join would produce overlapping column names
    #[error("[Q004] Join of '{left}' and '{right}' has unresolved column collisions: {}. Rename them before joining", columns.join(", "))]
    JoinCollision {
        left: String,
        right: String,
        columns: Vec<String>,
    },

    /// Q005: A clause would introduce a column name that already exists
    #[error("[Q005] Column '{column}' already exists in '{table}'")]
    DuplicateColumn { column: String, table: String },

    /// Q006: Alias not bound by the enclosing closure
    #[error("[Q006] Alias '{alias}' is not a parameter of the enclosing closure ({})", parameters.join(", "))]
    UnknownAlias {
        alias: String,
        parameters: Vec<String>,
    },

    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: IO error with file path context
    #[error("[E003] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E004: YAML parse error
    #[error("[E004] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Build a [`CoreError::Structural`] for the given node kind.
    pub fn structural(node: impl std::fmt::Display, message: impl Into<String>) -> Self {
        CoreError::Structural {
            node: node.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
