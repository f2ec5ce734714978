use crate::table::Value;
use serde::Serialize;

/// Supported column data types for loaded tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Boolean values (true/false)
    Boolean,
    /// 64-bit signed integers
    BigInt,
    /// Double-precision floating point numbers
    Double,
    /// Variable-length strings
    Varchar,
    /// Date and time
    Timestamp,
    /// Date without time component
    Date,
    /// Time without date component
    Time,
}

/// Coarse classification of a column type, as reported by the data type check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    Numeric,
    Text,
    Temporal,
    Boolean,
}

impl TypeCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Numeric => "numeric",
            TypeCategory::Text => "text",
            TypeCategory::Temporal => "temporal",
            TypeCategory::Boolean => "boolean",
        }
    }
}

impl ColumnType {
    /// Returns the string representation of the column type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::BigInt => "bigint",
            ColumnType::Double => "double",
            ColumnType::Varchar => "varchar",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
        }
    }

    pub const fn category(&self) -> TypeCategory {
        match self {
            ColumnType::Boolean => TypeCategory::Boolean,
            ColumnType::BigInt | ColumnType::Double => TypeCategory::Numeric,
            ColumnType::Varchar => TypeCategory::Text,
            ColumnType::Timestamp | ColumnType::Date | ColumnType::Time => TypeCategory::Temporal,
        }
    }

    /// Infers the type of a single value; `None` for nulls.
    pub(crate) fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(ColumnType::Boolean),
            Value::Int(_) => Some(ColumnType::BigInt),
            Value::Float(_) => Some(ColumnType::Double),
            Value::Text(_) => Some(ColumnType::Varchar),
            Value::Date(_) => Some(ColumnType::Date),
            Value::Time(_) => Some(ColumnType::Time),
            Value::DateTime(_) => Some(ColumnType::Timestamp),
        }
    }

    /// Detects the most specific common type from a collection of candidate types.
    /// A column without any value is numeric, the dataframe convention for an
    /// all-missing column. Inconsistent types fall back to VARCHAR.
    pub(crate) fn detect(types: Vec<Option<ColumnType>>) -> ColumnType {
        let types: Vec<ColumnType> = types.into_iter().flatten().collect();
        if types.is_empty() {
            ColumnType::Double
        } else if types.iter().all(|kind| kind.is_boolean()) {
            ColumnType::Boolean
        } else if types.iter().all(|kind| kind.is_int()) {
            ColumnType::BigInt
        } else if types.iter().all(|kind| kind.is_float()) {
            ColumnType::Double
        } else if types.iter().all(|kind| kind.is_date()) {
            ColumnType::Date
        } else if types.iter().all(|kind| kind.is_time()) {
            ColumnType::Time
        } else if types.iter().all(|kind| kind.is_datetime()) {
            ColumnType::Timestamp
        } else {
            ColumnType::Varchar
        }
    }

    /// Returns true if this column type represents boolean values.
    #[inline]
    pub fn is_boolean(&self) -> bool {
        matches!(self, ColumnType::Boolean)
    }

    /// Returns true if this column type represents integer values.
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, ColumnType::BigInt)
    }

    /// Returns true if this column type represents numeric values (integer or floating point).
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, ColumnType::BigInt | ColumnType::Double)
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, ColumnType::Varchar)
    }

    #[inline]
    pub fn is_date(&self) -> bool {
        matches!(self, ColumnType::Date)
    }

    #[inline]
    pub fn is_time(&self) -> bool {
        matches!(self, ColumnType::Time)
    }

    /// Returns true if this column type represents date/time related values.
    #[inline]
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            ColumnType::Timestamp | ColumnType::Date | ColumnType::Time
        )
    }
}
