//! Literal leaf values for the query IR

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Immutable wrapper around a single literal value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Literal<T> {
    value: T,
}

impl<T> Literal<T> {
    /// Wrap a value
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Borrow the wrapped value
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// Integer literal
pub type IntegerLiteral = Literal<i64>;
/// String literal
pub type StringLiteral = Literal<String>;
/// Boolean literal
pub type BooleanLiteral = Literal<bool>;
/// Date (or date-time) literal
pub type DateLiteral = Literal<NaiveDateTime>;

/// The closed set of literal kinds the IR can carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralValue {
    /// Integer literal
    Integer(IntegerLiteral),
    /// String literal
    String(StringLiteral),
    /// Boolean literal
    Boolean(BooleanLiteral),
    /// Date literal; plain dates are stored at midnight
    Date(DateLiteral),
}

impl From<i64> for LiteralValue {
    fn from(v: i64) -> Self {
        LiteralValue::Integer(Literal::new(v))
    }
}

impl From<i32> for LiteralValue {
    fn from(v: i32) -> Self {
        LiteralValue::Integer(Literal::new(i64::from(v)))
    }
}

impl From<&str> for LiteralValue {
    fn from(v: &str) -> Self {
        LiteralValue::String(Literal::new(v.to_string()))
    }
}

impl From<String> for LiteralValue {
    fn from(v: String) -> Self {
        LiteralValue::String(Literal::new(v))
    }
}

impl From<bool> for LiteralValue {
    fn from(v: bool) -> Self {
        LiteralValue::Boolean(Literal::new(v))
    }
}

impl From<NaiveDateTime> for LiteralValue {
    fn from(v: NaiveDateTime) -> Self {
        LiteralValue::Date(Literal::new(v))
    }
}

impl From<NaiveDate> for LiteralValue {
    fn from(v: NaiveDate) -> Self {
        LiteralValue::Date(Literal::new(v.and_time(chrono::NaiveTime::MIN)))
    }
}
