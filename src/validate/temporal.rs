//! Date and time format checks.
//!
//! Both checks share one strategy: pick candidate columns by name prefix,
//! fall back to text columns whose every value matches the format, then
//! validate each candidate. Matching is purely syntactic, so `2024-02-30`
//! passes as a date and `25:61` passes as a time.
use crate::table::{Column, Table};
use crate::validate::{IssueReport, ValidationError};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Keys of the single entry reported when no candidate column exists.
pub const DATE_NO_CANDIDATES_KEY: &str = "Info";
pub const TIME_NO_CANDIDATES_KEY: &str = "Time";

/// A textual date or time format and how to find the columns that use it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemporalFormat {
    /// What the values represent ("date", "time")
    pub subject: String,
    /// Lower-case column name prefix marking a candidate column
    pub prefix: String,
    /// Pattern every value must match
    pub pattern: String,
    /// Human description of the pattern used in messages
    pub description: String,
    /// Issue key used when no column is a candidate
    pub no_candidates_key: String,
}

impl TemporalFormat {
    /// ISO 8601 calendar dates, `YYYY-MM-DD`.
    pub fn date() -> Self {
        TemporalFormat {
            subject: "date".to_owned(),
            prefix: "date".to_owned(),
            pattern: r"^\d{4}-\d{2}-\d{2}$".to_owned(),
            description: "ISO 8601 format (YYYY-MM-DD)".to_owned(),
            no_candidates_key: DATE_NO_CANDIDATES_KEY.to_owned(),
        }
    }

    /// ISO 8601 clock times, `HH:MM` with optional `:SS`.
    pub fn time() -> Self {
        TemporalFormat {
            subject: "time".to_owned(),
            prefix: "time".to_owned(),
            pattern: r"^\d{2}:\d{2}(:\d{2})?$".to_owned(),
            description: "ISO 8601 format (HH:MM[:SS])".to_owned(),
            no_candidates_key: TIME_NO_CANDIDATES_KEY.to_owned(),
        }
    }

    /// Replaces the pattern; messages then quote the pattern itself.
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = pattern.to_owned();
        self.description = format!("the format {pattern}");
        self
    }

    fn regex(&self) -> Result<Regex, ValidationError> {
        Regex::new(&self.pattern).map_err(|source| ValidationError::InvalidPattern {
            pattern: self.pattern.to_owned(),
            source,
        })
    }
}

/// Issues plus the columns confirmed to follow the format.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub issues: IssueReport,
    pub valid: Vec<String>,
}

/// Two-stage candidate selection: columns named with the format's prefix
/// (case-insensitive), or when there are none, text columns whose every
/// non-null value matches the pattern.
pub fn select_columns(table: &Table, format: &TemporalFormat) -> Result<Vec<String>, ValidationError> {
    let regex = format.regex()?;
    Ok(select_with(table, format, &regex))
}

fn select_with(table: &Table, format: &TemporalFormat, regex: &Regex) -> Vec<String> {
    let by_name: Vec<String> = table
        .column_names()
        .filter(|name| name.to_lowercase().starts_with(&format.prefix))
        .map(str::to_owned)
        .collect();
    if !by_name.is_empty() {
        debug!(subject = format.subject.as_str(), columns = ?by_name, "selected by name");
        return by_name;
    }

    let by_values: Vec<String> = table
        .columns()
        .iter()
        .filter(|column| column.kind().is_text() && all_match(column, regex))
        .map(|column| column.name().to_owned())
        .collect();
    debug!(subject = format.subject.as_str(), columns = ?by_values, "selected by values");
    by_values
}

fn all_match(column: &Column, regex: &Regex) -> bool {
    column
        .non_null()
        .all(|value| value.as_text().is_some_and(|text| regex.is_match(text)))
}

/// Validates the candidate columns of `format`.
///
/// Text columns whose values all match are valid; other text columns get a
/// format issue; non-text candidates get a type issue. Without any candidate
/// the report holds a single informational entry.
pub fn check_format(table: &Table, format: &TemporalFormat) -> Result<ValidationResult, ValidationError> {
    let regex = format.regex()?;
    let mut result = ValidationResult::default();

    let candidates = select_with(table, format, &regex);
    if candidates.is_empty() {
        result.issues.insert(
            format.no_candidates_key.as_str(),
            format!(
                "No columns detected that appear to represent {} in standard or inferred formats.",
                format.subject
            ),
        );
        return Ok(result);
    }

    for name in candidates {
        let column = table
            .column(&name)
            .ok_or_else(|| ValidationError::ColumnNotFound(name.to_owned()))?;
        if !column.kind().is_text() {
            result.issues.insert(
                name.as_str(),
                format!("Column '{name}' is not in a text format (string type required for validation)."),
            );
        } else if all_match(column, &regex) {
            result.valid.push(name);
        } else {
            result.issues.insert(
                name.as_str(),
                format!(
                    "Column '{name}' does not follow {}. Please double check it and update it if necessary.",
                    format.description
                ),
            );
        }
    }
    Ok(result)
}

pub fn check_date_format(table: &Table) -> Result<ValidationResult, ValidationError> {
    check_format(table, &TemporalFormat::date())
}

pub fn check_time_format(table: &Table) -> Result<ValidationResult, ValidationError> {
    check_format(table, &TemporalFormat::time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn text(name: &str, values: &[Option<&str>]) -> Column {
        Column::new(name, values.iter().map(|value| Value::from(*value)).collect())
    }

    #[test]
    fn syntax_only_dates_are_valid() {
        let table = Table::new(vec![text(
            "date_sampled",
            &[Some("2024-01-05"), Some("2024-02-30")],
        )])
        .unwrap();

        let result = check_date_format(&table).unwrap();
        assert!(result.issues.is_empty());
        assert_eq!(result.valid, vec!["date_sampled"]);
    }

    #[test]
    fn named_column_with_bad_values() {
        let table = Table::new(vec![text("Date", &[Some("05/01/2024"), Some("2024-01-06")])]).unwrap();

        let result = check_date_format(&table).unwrap();
        assert!(result.valid.is_empty());
        assert_eq!(
            result.issues.get("Date"),
            Some("Column 'Date' does not follow ISO 8601 format (YYYY-MM-DD). Please double check it and update it if necessary.")
        );
    }

    #[test]
    fn named_column_with_wrong_type() {
        let table = Table::new(vec![Column::new(
            "date_julian",
            vec![Value::Int(20240105), Value::Int(20240106)],
        )])
        .unwrap();

        let result = check_date_format(&table).unwrap();
        assert_eq!(
            result.issues.get("date_julian"),
            Some("Column 'date_julian' is not in a text format (string type required for validation).")
        );
    }

    #[test]
    fn fallback_selects_matching_text_columns() {
        let table = Table::new(vec![
            text("sampled", &[Some("2024-01-05"), None]),
            text("site", &[Some("reef"), Some("bay")]),
            Column::new("depth", vec![Value::Int(1), Value::Int(2)]),
        ])
        .unwrap();

        let columns = select_columns(&table, &TemporalFormat::date()).unwrap();
        assert_eq!(columns, vec!["sampled"]);

        let result = check_date_format(&table).unwrap();
        assert_eq!(result.valid, vec!["sampled"]);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn name_selection_disables_fallback() {
        let table = Table::new(vec![
            text("DATE_utc", &[Some("2024-01-05")]),
            text("other", &[Some("2024-01-05")]),
        ])
        .unwrap();

        let columns = select_columns(&table, &TemporalFormat::date()).unwrap();
        assert_eq!(columns, vec!["DATE_utc"]);
    }

    #[test]
    fn no_candidates() {
        let table = Table::new(vec![text("site", &[Some("reef")])]).unwrap();

        let result = check_time_format(&table).unwrap();
        assert_eq!(result.issues.len(), 1);
        assert_eq!(
            result.issues.get(TIME_NO_CANDIDATES_KEY),
            Some("No columns detected that appear to represent time in standard or inferred formats.")
        );
    }

    #[test]
    fn no_candidate_keys_differ_per_format() {
        let table = Table::new(vec![text("site", &[Some("reef")])]).unwrap();

        let dates = check_date_format(&table).unwrap();
        assert_eq!(dates.issues.iter().map(|(key, _)| key).collect::<Vec<_>>(), vec!["Info"]);
        let times = check_time_format(&table).unwrap();
        assert_eq!(times.issues.iter().map(|(key, _)| key).collect::<Vec<_>>(), vec!["Time"]);

        let custom = check_format(&table, &TemporalFormat::time().with_pattern("^T")).unwrap();
        assert!(custom.issues.contains("Time"));
    }

    #[test]
    fn times_with_and_without_seconds() {
        let table = Table::new(vec![
            text("time_start", &[Some("08:30"), Some("17:45:10")]),
            text("time_end", &[Some("8:30"), Some("17:45")]),
        ])
        .unwrap();

        let result = check_time_format(&table).unwrap();
        assert_eq!(result.valid, vec!["time_start"]);
        assert_eq!(
            result.issues.get("time_end"),
            Some("Column 'time_end' does not follow ISO 8601 format (HH:MM[:SS]). Please double check it and update it if necessary.")
        );
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let table = Table::new(vec![text("date", &[Some("2024-01-05")])]).unwrap();
        let format = TemporalFormat::date().with_pattern("([0-9]");

        let result = check_format(&table, &format);
        assert!(matches!(result, Err(ValidationError::InvalidPattern { .. })));
    }

    #[test]
    fn custom_pattern_message() {
        let table = Table::new(vec![text("date", &[Some("2024-01-05")])]).unwrap();
        let format = TemporalFormat::date().with_pattern(r"^\d{2}/\d{2}/\d{4}$");

        let result = check_format(&table, &format).unwrap();
        assert_eq!(
            result.issues.get("date"),
            Some(r"Column 'date' does not follow the format ^\d{2}/\d{2}/\d{4}$. Please double check it and update it if necessary.")
        );
    }
}
