//! Table and column descriptions
//!
//! A [`Database`] is a named set of [`Table`]s; each table is an ordered
//! list of uniquely named [`Column`]s.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;

/// Logical column type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    /// Whole numbers
    Integer,
    /// Floating point numbers
    Float,
    /// Text
    String,
    /// Booleans
    Boolean,
    /// Calendar date
    Date,
    /// Date and time
    Timestamp,
    /// Not known (aggregate outputs, computed columns)
    Unknown,
    /// Any other named type, kept verbatim
    Other(String),
}

impl ColumnType {
    /// Parse a type name, case-insensitively.
    ///
    /// Unrecognised names are kept as [`ColumnType::Other`].
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_lowercase().as_str() {
            "int" | "integer" | "bigint" => ColumnType::Integer,
            "float" | "double" => ColumnType::Float,
            "str" | "string" | "varchar" | "text" => ColumnType::String,
            "bool" | "boolean" => ColumnType::Boolean,
            "date" => ColumnType::Date,
            "timestamp" | "datetime" => ColumnType::Timestamp,
            "unknown" => ColumnType::Unknown,
            _ => ColumnType::Other(trimmed.to_string()),
        }
    }

    /// Canonical name
    pub fn display_name(&self) -> Cow<'_, str> {
        match self {
            ColumnType::Integer => Cow::Borrowed("integer"),
            ColumnType::Float => Cow::Borrowed("float"),
            ColumnType::String => Cow::Borrowed("string"),
            ColumnType::Boolean => Cow::Borrowed("boolean"),
            ColumnType::Date => Cow::Borrowed("date"),
            ColumnType::Timestamp => Cow::Borrowed("timestamp"),
            ColumnType::Unknown => Cow::Borrowed("unknown"),
            ColumnType::Other(name) => Cow::Borrowed(name.as_str()),
        }
    }
}

impl From<String> for ColumnType {
    fn from(name: String) -> Self {
        ColumnType::parse(&name)
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        ty.display_name().into_owned()
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    /// Create a column
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A named, ordered list of columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
}

impl Table {
    /// Build a table from `(name, type)` pairs
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns
                .into_iter()
                .map(|(name, ty)| Column::new(name, ty))
                .collect(),
        }
    }

    /// Find a column by exact name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// True if a column with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the table has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Fail on the first repeated column name
    pub fn check_unique_columns(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(CoreError::DuplicateColumn {
                    column: col.name.clone(),
                    table: self.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A named set of tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Database name
    pub name: String,
    /// Tables
    pub tables: Vec<Table>,
}

impl Database {
    /// Create a database
    pub fn new(name: impl Into<String>, tables: Vec<Table>) -> Self {
        Self {
            name: name.into(),
            tables,
        }
    }

    /// Look up a table, failing with [`CoreError::UnknownTable`]
    pub fn table(&self, name: &str) -> CoreResult<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| CoreError::UnknownTable {
                table: name.to_string(),
                database: self.name.clone(),
            })
    }

    /// Table names in order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
