//! Query dialect abstraction

use rq_core::{BoundQuery, Clause};

use crate::error::DialectResult;

/// Trait for target query dialects
pub trait QueryDialect: Send + Sync {
    /// Render a bound query, ending with the runtime stage
    fn compile(&self, query: &BoundQuery) -> DialectResult<String>;

    /// Render a clause sequence without the runtime stage.
    ///
    /// Fragments are joined with [`pipeline_connective`](Self::pipeline_connective)
    /// in clause order.
    fn compile_clauses(&self, clauses: &[Clause]) -> DialectResult<String>;

    /// Text joining consecutive pipeline fragments
    fn pipeline_connective(&self) -> &'static str;

    /// Get the dialect name
    fn name(&self) -> &'static str;
}
