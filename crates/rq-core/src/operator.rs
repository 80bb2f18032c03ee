//! Stateless operator tags

use serde::{Deserialize, Serialize};

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    /// Equality
    Equals,
    /// Inequality
    NotEquals,
    /// Less than
    LessThan,
    /// Less than or equal
    LessThanEquals,
    /// Greater than
    GreaterThan,
    /// Greater than or equal
    GreaterThanEquals,
    /// Membership
    In,
    /// Negated membership
    NotIn,
    /// Identity
    Is,
    /// Negated identity
    IsNot,
    /// Logical AND
    And,
    /// Logical OR
    Or,
    /// Addition
    Add,
    /// Subtraction
    Subtract,
    /// Multiplication
    Multiply,
    /// Division
    Divide,
    /// Modulo
    Modulo,
    /// Exponentiation
    Exponent,
    /// Bitwise AND
    BitwiseAnd,
    /// Bitwise OR
    BitwiseOr,
}

impl BinaryOperator {
    /// Human-readable label for error messages
    pub fn label(&self) -> &'static str {
        match self {
            BinaryOperator::Equals => "equals",
            BinaryOperator::NotEquals => "not-equals",
            BinaryOperator::LessThan => "less-than",
            BinaryOperator::LessThanEquals => "less-than-equals",
            BinaryOperator::GreaterThan => "greater-than",
            BinaryOperator::GreaterThanEquals => "greater-than-equals",
            BinaryOperator::In => "in",
            BinaryOperator::NotIn => "not-in",
            BinaryOperator::Is => "is",
            BinaryOperator::IsNot => "is-not",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Add => "add",
            BinaryOperator::Subtract => "subtract",
            BinaryOperator::Multiply => "multiply",
            BinaryOperator::Divide => "divide",
            BinaryOperator::Modulo => "modulo",
            BinaryOperator::Exponent => "exponent",
            BinaryOperator::BitwiseAnd => "bitwise-and",
            BinaryOperator::BitwiseOr => "bitwise-or",
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    /// Logical NOT
    Not,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "not"),
        }
    }
}
