//! rq-dialect - Dialect back ends for relq
//!
//! This crate renders the rq-core IR to target query text. It provides the
//! free-variable extractor used to synthesize closure parameter lists, the
//! [`QueryDialect`] trait, the pure relation compiler, and the storage
//! declaration generator.

pub mod dialect;
pub mod error;
pub mod free_vars;
pub mod pure;
pub mod storage;

pub use dialect::QueryDialect;
pub use error::{DialectError, DialectResult};
pub use free_vars::{free_variables, FreeVariableExtractor};
pub use pure::PureRelationDialect;
pub use storage::{storage_type, DuckDbStorage};
