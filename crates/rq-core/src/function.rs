//! Named functions callable from a `FunctionExpression`

use serde::{Deserialize, Serialize};

/// How many parameters a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` parameters
    Exact(usize),
    /// At least `n` parameters
    AtLeast(usize),
}

impl Arity {
    /// Check a parameter count against this arity
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Function tag
///
/// Parameter order mirrors the target function signature: the first
/// parameter is the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Function {
    /// Row/element count
    Count,
    /// Arithmetic mean
    Average,
    /// Sum
    Sum,
    /// Minimum
    Min,
    /// Maximum
    Max,
    /// Remainder of the receiver divided by the second parameter
    Modulo,
    /// Receiver raised to the second parameter
    Exponent,
    /// Concatenation of all parameters as strings
    StringConcat,
}

impl Function {
    /// Accepted parameter count
    pub fn arity(&self) -> Arity {
        match self {
            Function::Count
            | Function::Average
            | Function::Sum
            | Function::Min
            | Function::Max => Arity::Exact(1),
            Function::Modulo | Function::Exponent => Arity::Exact(2),
            Function::StringConcat => Arity::AtLeast(1),
        }
    }

    /// Label for error messages
    pub fn label(&self) -> &'static str {
        match self {
            Function::Count => "count",
            Function::Average => "average",
            Function::Sum => "sum",
            Function::Min => "min",
            Function::Max => "max",
            Function::Modulo => "modulo",
            Function::Exponent => "exponent",
            Function::StringConcat => "string-concat",
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
