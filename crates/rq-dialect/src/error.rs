//! Error types for rq-dialect

use rq_core::CoreError;
use thiserror::Error;

/// Compilation and declaration-generation errors
#[derive(Error, Debug)]
pub enum DialectError {
    /// D001: The active dialect has no rendering rule for a construct
    #[error("[D001] {dialect} dialect cannot render {construct}")]
    UnsupportedConstruct { dialect: String, construct: String },

    /// D002: Declared column type has no storage equivalent
    #[error("[D002] Column '{column}' has type '{column_type}' with no storage mapping")]
    TypeMapping { column: String, column_type: String },

    /// D003: Malformed IR found during compilation
    #[error("[D003] {0}")]
    Core(#[from] CoreError),
}

impl DialectError {
    /// Build a [`DialectError::UnsupportedConstruct`]
    pub fn unsupported(dialect: &str, construct: impl std::fmt::Display) -> Self {
        DialectError::UnsupportedConstruct {
            dialect: dialect.to_string(),
            construct: construct.to_string(),
        }
    }
}

/// Result type alias for DialectError
pub type DialectResult<T> = Result<T, DialectError>;
