//! # Validators
//!
//! Independent checks over a loaded [`Table`](crate::table::Table). Every
//! check reads the table only, except the coordinate check which normalizes
//! the sign of the latitude column in place.
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

pub mod coordinates;
pub mod missing;
pub mod names;
pub mod temporal;
pub mod types;

pub use coordinates::{check_coordinates, detect_coordinate_columns, CoordinateResult};
pub use missing::{check_missing_values, MissingCount};
pub use names::check_column_names;
pub use temporal::{check_date_format, check_format, check_time_format, TemporalFormat, ValidationResult};
pub use types::{check_data_types, TypeSummary};

/// Errors raised by a check itself, as opposed to the issues it reports.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
}

/// Column name to issue message, in insertion order.
///
/// Keys are unique: inserting a key that is already present replaces its
/// message and keeps its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IssueReport {
    entries: Vec<(String, String)>,
}

impl IssueReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, message: impl Into<String>) {
        let column = column.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(key, _)| *key == column) {
            Some(entry) => entry.1 = message,
            None => self.entries.push((column, message)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == column)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(column, message)| (column.as_str(), message.as_str()))
    }
}

impl Serialize for IssueReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, message) in &self.entries {
            map.serialize_entry(column, message)?;
        }
        map.end()
    }
}
