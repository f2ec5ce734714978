//! # Report
//!
//! The presentation side of the checker. A [`Session`] holds everything one
//! interactive run needs (options, the loaded table, the coordinate columns
//! found last) and turns the table into a [`Report`]: one panel per check.
//!
//! A check that fails does not take the report down with it; its panel
//! carries the failure message and the other panels are unaffected.
use crate::error::{ResultMessage, RustyQualityError};
use crate::loader::{load_table, LoadError, LoadOptions};
use crate::map::MapView;
use crate::table::Table;
use crate::validate::{
    check_column_names, check_coordinates, check_data_types, check_format, check_missing_values,
    TemporalFormat,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod guidelines;
mod render;

pub use render::render_text;

/// Number of rows shown in the data preview.
pub const PREVIEW_ROWS: usize = 6;

/// One line of panel content.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Line {
    Success(String),
    Warning(String),
    Info(String),
    /// Two-column listing, e.g. column name and missing count
    Listing(Vec<(String, String)>),
    /// First rows of the table
    Preview {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// What a panel shows: its lines, or the error its check raised.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelOutcome {
    Lines(Vec<Line>),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub outcome: PanelOutcome,
}

impl Panel {
    /// Runs `check` and wraps its outcome; an error becomes a failure
    /// message scoped to this panel.
    fn run<F>(title: &str, action: &str, check: F) -> Panel
    where
        F: FnOnce() -> Result<Vec<Line>, RustyQualityError>,
    {
        let outcome = match check() {
            Ok(lines) => PanelOutcome::Lines(lines),
            Err(error) => {
                warn!(panel = title, %error, "check failed");
                PanelOutcome::Failed(format!("An error occurred while {action}: {error}"))
            }
        };
        Panel {
            title: title.to_owned(),
            outcome,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, PanelOutcome::Failed(_))
    }
}

/// All panels produced for one loaded table.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub source: String,
    pub rows: usize,
    pub columns: usize,
    pub panels: Vec<Panel>,
    pub map: Option<MapView>,
}

impl Report {
    pub fn panel(&self, title: &str) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.title == title)
    }

    /// Writes the coordinate map as an HTML page. Returns false when the
    /// report has no map.
    pub fn write_map(&self, path: &Path) -> Result<bool, RustyQualityError> {
        let Some(map) = &self.map else {
            return Ok(false);
        };
        std::fs::write(path, map.to_html())
            .map_err(RustyQualityError::from)
            .with_prefix(&format!("Failed to write map to '{}'", path.display()))?;
        info!(path = %path.display(), markers = map.markers.len(), "map written");
        Ok(true)
    }
}

pub const UPLOADED_DATA: &str = "Uploaded Data";
pub const COLUMN_NAMING: &str = "Column Naming Issues";
pub const MISSING_VALUES: &str = "Missing Values";
pub const DATA_TYPES: &str = "Data Types";
pub const DATE_FORMAT: &str = "Date Column Format Issues";
pub const TIME_FORMAT: &str = "Time Column Format Issues";
pub const COORDINATES: &str = "Coordinate Issues (Latitude and Longitude)";
pub const MAP: &str = "Map of Coordinates";

/// State of one interactive checking session.
#[derive(Debug)]
pub struct Session {
    options: LoadOptions,
    date_format: TemporalFormat,
    time_format: TemporalFormat,
    source: Option<PathBuf>,
    table: Option<Table>,
    coordinates: Option<(String, String)>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(LoadOptions::default())
    }
}

impl Session {
    pub fn new(options: LoadOptions) -> Self {
        Session {
            options,
            date_format: TemporalFormat::date(),
            time_format: TemporalFormat::time(),
            source: None,
            table: None,
            coordinates: None,
        }
    }

    pub fn with_formats(mut self, date_format: TemporalFormat, time_format: TemporalFormat) -> Self {
        self.date_format = date_format;
        self.time_format = time_format;
        self
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Changes the parsing options; takes effect on the next load.
    pub fn set_options(&mut self, options: LoadOptions) {
        self.options = options;
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Latitude and longitude columns resolved by the last report.
    pub fn coordinates(&self) -> Option<(&str, &str)> {
        self.coordinates
            .as_ref()
            .map(|(latitude, longitude)| (latitude.as_str(), longitude.as_str()))
    }

    /// Loads `path` with the current options, replacing the current table.
    /// On failure the session is left without a table.
    pub fn load(&mut self, path: &Path) -> Result<&Table, LoadError> {
        self.clear();
        let table = load_table(path, &self.options)?;
        self.source = Some(path.to_owned());
        Ok(self.table.insert(table))
    }

    /// Forgets the current file, table and coordinate columns.
    pub fn clear(&mut self) {
        self.source = None;
        self.table = None;
        self.coordinates = None;
    }

    /// Runs every check over the current table. `None` when nothing is loaded.
    pub fn report(&mut self) -> Option<Report> {
        let table = self.table.as_mut()?;
        let mut panels = Vec::new();

        panels.push(Panel::run(UPLOADED_DATA, "displaying the data", || {
            Ok(vec![preview(table)])
        }));

        panels.push(Panel::run(COLUMN_NAMING, "checking column names", || {
            let issues = check_column_names(table);
            if issues.is_empty() {
                return Ok(vec![Line::Success(
                    "All column names follow best practices.".to_owned(),
                )]);
            }
            Ok(issues
                .iter()
                .map(|(column, issue)| Line::Warning(format!("Column '{column}': {issue}")))
                .collect())
        }));

        panels.push(Panel::run(MISSING_VALUES, "checking for missing values", || {
            let missing = check_missing_values(table);
            if missing.is_empty() {
                return Ok(vec![Line::Success("No missing values found.".to_owned())]);
            }
            Ok(vec![Line::Listing(
                missing
                    .into_iter()
                    .map(|missing| (missing.column, missing.count.to_string()))
                    .collect(),
            )])
        }));

        panels.push(Panel::run(DATA_TYPES, "displaying data types", || {
            Ok(vec![Line::Listing(
                check_data_types(table)
                    .into_iter()
                    .map(|summary| {
                        let kind = format!(
                            "{} ({})",
                            summary.kind.as_str(),
                            summary.category.as_str()
                        );
                        (summary.column, kind)
                    })
                    .collect(),
            )])
        }));

        for (title, action, format) in [
            (DATE_FORMAT, "checking date formats", &self.date_format),
            (TIME_FORMAT, "checking time formats", &self.time_format),
        ] {
            panels.push(Panel::run(title, action, || temporal_lines(table, format)));
        }

        let mut coordinates = None;
        panels.push(Panel::run(COORDINATES, "checking coordinates", || {
            let result = check_coordinates(&mut *table)?;
            if let (Some(latitude), Some(longitude)) = (&result.latitude, &result.longitude) {
                coordinates = Some((latitude.to_owned(), longitude.to_owned()));
            }
            if let Some(success) = result.success {
                return Ok(vec![Line::Success(success)]);
            }
            Ok(result
                .issues
                .iter()
                .map(|(column, issue)| Line::Warning(format!("{column}: {issue}")))
                .collect())
        }));
        self.coordinates = coordinates;

        let mut map = None;
        if let Some((latitude, longitude)) = &self.coordinates {
            panels.push(Panel::run(MAP, "creating the map", || {
                let view = MapView::from_table(table, latitude, longitude)?;
                let line = Line::Info(format!(
                    "{} unique locations centred on ({:.5}, {:.5}).",
                    view.markers.len(),
                    view.center.0,
                    view.center.1
                ));
                map = Some(view);
                Ok(vec![line])
            }));
        }

        Some(Report {
            source: self
                .source
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            rows: table.row_count(),
            columns: table.columns().len(),
            panels,
            map,
        })
    }
}

fn preview(table: &Table) -> Line {
    Line::Preview {
        columns: table.column_names().map(str::to_owned).collect(),
        rows: table
            .head(PREVIEW_ROWS)
            .into_iter()
            .map(|row| row.into_iter().map(ToString::to_string).collect())
            .collect(),
    }
}

fn temporal_lines(table: &Table, format: &TemporalFormat) -> Result<Vec<Line>, RustyQualityError> {
    let result = check_format(table, format)?;
    let mut lines: Vec<Line> = result
        .issues
        .iter()
        .map(|(column, issue)| {
            if column == format.no_candidates_key && result.valid.is_empty() && result.issues.len() == 1 {
                Line::Info(issue.to_owned())
            } else {
                Line::Warning(issue.to_owned())
            }
        })
        .collect();
    lines.extend(
        result
            .valid
            .iter()
            .map(|column| Line::Success(format!("Column '{column}' follows {}.", format.description))),
    );
    Ok(lines)
}
