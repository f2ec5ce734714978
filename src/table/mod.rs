//! # Table Module
//!
//! The in-memory columnar model every check runs against. A table is an
//! ordered list of named columns; every column holds one value per row and
//! carries the type inferred from its values when it was built.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

mod column;

pub use column::{ColumnType, TypeCategory};

/// Errors raised while assembling a table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column '{name}' has {found} values, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// A single scalar cell value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, for integers and floats only.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str(""),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            // Debug keeps the trailing ".0" on integral floats.
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Text(value) => f.write_str(value),
            Value::Date(value) => write!(f, "{value}"),
            Value::Time(value) => write!(f, "{value}"),
            Value::DateTime(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A named column with its inferred type.
#[derive(Clone, Debug, Serialize)]
pub struct Column {
    name: String,
    kind: ColumnType,
    values: Vec<Value>,
}

impl Column {
    /// Builds a column and infers its type from the values.
    ///
    /// Values are coerced to agree with the inferred type: integers inside a
    /// double column become floats, and every value of a varchar column is
    /// rendered to text.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let kind = ColumnType::detect(values.iter().map(ColumnType::of).collect());
        let values = values
            .into_iter()
            .map(|value| match (kind, value) {
                (_, Value::Null) => Value::Null,
                (ColumnType::Double, Value::Int(value)) => Value::Float(value as f64),
                (ColumnType::Varchar, Value::Text(value)) => Value::Text(value),
                (ColumnType::Varchar, value) => Value::Text(value.to_string()),
                (_, value) => value,
            })
            .collect();
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnType {
        self.kind
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Mutable access to the values; the length stays fixed.
    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_null()).count()
    }

    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|value| !value.is_null())
    }
}

/// An ordered set of equally long columns.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(column) = columns.iter().find(|column| column.values.len() != expected) {
                return Err(TableError::LengthMismatch {
                    name: column.name.to_owned(),
                    expected,
                    found: column.values.len(),
                });
            }
        }
        Ok(Table { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |column| column.values.len())
    }

    /// The first `rows` rows, cell values in column order.
    pub fn head(&self, rows: usize) -> Vec<Vec<&Value>> {
        (0..self.row_count().min(rows))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| &column.values[row])
                    .collect()
            })
            .collect()
    }
}
