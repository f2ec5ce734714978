//! # Rusty Quality
//!
//! Data quality checks for tabular scientific datasets stored as delimited
//! text (CSV, TSV, pipe or semicolon separated) or spreadsheets.
//!
//! ## Features
//!
//! - **Flexible loading**: selectable separator and text encoding for delimited
//!   files; Excel (`.xls`, `.xlsx`, `.xlsm`, `.xlsb`, `.xla`, `.xlam`) and
//!   OpenDocument (`.ods`) spreadsheets, with categorized load errors
//! - **Column naming**: flags whitespace, punctuation and non-alphanumeric names
//! - **Missing values**: per-column counts of missing entries
//! - **Data types**: the inferred type of every column
//! - **Date and time formats**: ISO 8601 conformance of date and time columns,
//!   found by name or by their values
//! - **Coordinates**: latitude/longitude detection, sign normalization and
//!   decimal degree validation
//! - **Map preview**: unique coordinates rendered as a Leaflet page
//!
//! ## Usage
//!
//! ```no_run
//! use rusty_quality::loader::LoadOptions;
//! use rusty_quality::report::{render_text, Session};
//! use std::path::Path;
//!
//! let mut session = Session::new(LoadOptions::default());
//! session.load(Path::new("stations.csv"))?;
//! if let Some(report) = session.report() {
//!     print!("{}", render_text(&report));
//! }
//! # Ok::<(), rusty_quality::loader::LoadError>(())
//! ```
pub mod error;
pub mod loader;
pub mod map;
pub mod report;
pub mod table;
pub mod validate;

pub use error::RustyQualityError;
pub use loader::{load_table, LoadError, LoadOptions, Separator, TextEncoding};
pub use report::{Report, Session};
pub use table::{Column, ColumnType, Table, Value};
