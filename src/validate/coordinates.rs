//! Latitude/longitude detection and decimal degree validation.
//!
//! Latitudes are normalized to the southern hemisphere convention before
//! validation: every positive latitude is negated in place. This is the only
//! check that changes the table.
use crate::table::{Column, Table, Value};
use crate::validate::{IssueReport, ValidationError};
use regex::RegexBuilder;
use serde::Serialize;
use tracing::debug;

pub const UNDETECTED_KEY: &str = "Coordinates";
pub const UNDETECTED: &str = "Latitude and/or Longitude columns could not be automatically detected. Ensure column names contain 'lat' or 'latitude' and 'lon' or 'longitude'.";
pub const LATITUDE_OUT_OF_RANGE: &str = "Contains values outside the range -90 to 90.";
pub const LONGITUDE_OUT_OF_RANGE: &str = "Contains values outside the range -180 to 180.";
pub const LATITUDE_NOT_NUMERIC: &str = "Latitude column is not in decimal degrees (numeric type required).";
pub const LONGITUDE_NOT_NUMERIC: &str = "Longitude column is not in decimal degrees (numeric type required).";

/// Outcome of the coordinate check.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CoordinateResult {
    pub issues: IssueReport,
    pub success: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Finds the first latitude and the first longitude column.
///
/// A name is a latitude when it starts with `lat` or contains `latitude`,
/// ignoring case; longitudes likewise with `lon` and `longitude`.
pub fn detect_coordinate_columns(table: &Table) -> (Option<String>, Option<String>) {
    let find = |pattern: &str| {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("Hardcode regex pattern");
        table
            .column_names()
            .find(|name| regex.is_match(name))
            .map(str::to_owned)
    };
    (find("^lat|latitude"), find("^lon|longitude"))
}

/// Negates every positive numeric latitude. Returns how many values changed.
pub fn normalize_latitude(column: &mut Column) -> usize {
    let mut changed = 0;
    for value in column.values_mut() {
        match value {
            Value::Int(latitude) if *latitude > 0 => {
                *latitude = -*latitude;
                changed += 1;
            }
            Value::Float(latitude) if *latitude > 0.0 => {
                *latitude = -*latitude;
                changed += 1;
            }
            _ => (),
        }
    }
    changed
}

/// True when every non-null value is a number within `[min, max]`.
fn within(column: &Column, min: f64, max: f64) -> bool {
    column
        .non_null()
        .all(|value| value.as_f64().is_some_and(|degrees| (min..=max).contains(&degrees)))
}

/// Detects the coordinate columns, normalizes latitudes and validates both
/// columns as decimal degrees.
///
/// Every failing condition is reported on its own column; a type issue on a
/// column replaces its range issue. The detected names are returned whatever
/// the outcome.
pub fn check_coordinates(table: &mut Table) -> Result<CoordinateResult, ValidationError> {
    let mut result = CoordinateResult::default();
    let (Some(latitude), Some(longitude)) = detect_coordinate_columns(table) else {
        result.issues.insert(UNDETECTED_KEY, UNDETECTED);
        return Ok(result);
    };

    let latitude_column = table
        .column_mut(&latitude)
        .ok_or_else(|| ValidationError::ColumnNotFound(latitude.to_owned()))?;
    let changed = normalize_latitude(latitude_column);
    debug!(column = latitude.as_str(), changed, "latitudes normalized");

    let latitude_column = table
        .column(&latitude)
        .ok_or_else(|| ValidationError::ColumnNotFound(latitude.to_owned()))?;
    let longitude_column = table
        .column(&longitude)
        .ok_or_else(|| ValidationError::ColumnNotFound(longitude.to_owned()))?;

    let latitude_in_degrees = within(latitude_column, -90.0, 90.0);
    let longitude_in_degrees = within(longitude_column, -180.0, 180.0);
    let latitude_is_numeric = latitude_column.kind().is_float();
    let longitude_is_numeric = longitude_column.kind().is_float();

    if latitude_in_degrees && longitude_in_degrees && latitude_is_numeric && longitude_is_numeric {
        result.success = Some(format!(
            "The '{latitude}' and '{longitude}' columns appear to be in decimal degrees and within valid ranges."
        ));
    } else {
        if !latitude_in_degrees {
            result.issues.insert(latitude.as_str(), LATITUDE_OUT_OF_RANGE);
        }
        if !longitude_in_degrees {
            result.issues.insert(longitude.as_str(), LONGITUDE_OUT_OF_RANGE);
        }
        if !latitude_is_numeric {
            result.issues.insert(latitude.as_str(), LATITUDE_NOT_NUMERIC);
        }
        if !longitude_is_numeric {
            result.issues.insert(longitude.as_str(), LONGITUDE_NOT_NUMERIC);
        }
    }

    result.latitude = Some(latitude);
    result.longitude = Some(longitude);
    Ok(result)
}
