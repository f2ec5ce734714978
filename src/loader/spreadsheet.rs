//! Spreadsheet input for Excel (.xlsx, .xlsm, .xlam, .xlsb, .xls, .xla) and
//! OpenDocument (.ods) files. The first row of the selected sheet holds the
//! column names; cell values keep the types stored in the workbook.
use crate::loader::{unique_names, LoadError};
use crate::table::{Column, Table, TableError, Value};
use calamine::{
    open_workbook, Data, Ods, OdsError, Range, Reader, Xls, XlsError, Xlsb, XlsbError, Xlsx,
    XlsxError,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use glob::Pattern;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// File extensions read as spreadsheets.
pub const EXTENSIONS: [&str; 7] = ["xlsx", "xlsm", "xlam", "xlsb", "xls", "xla", "ods"];

/// Custom error types for spreadsheet operations.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Error in Excel 2007+ format (.xlsx, .xlsm, .xlam)
    #[error("Invalid xlsx file format: {0}")]
    InvalidXlsxFileFormat(#[from] XlsxError),

    /// Error in Excel Binary format (.xlsb)
    #[error("Invalid xlsb file format: {0}")]
    InvalidXlsbFileFormat(#[from] XlsbError),

    /// Error in legacy Excel format (.xls, .xla)
    #[error("Invalid xls file format: {0}")]
    InvalidXlsFileFormat(#[from] XlsError),

    /// Error in OpenDocument format (.ods)
    #[error("Invalid ods file format: {0}")]
    InvalidOdsFileFormat(#[from] OdsError),

    /// Unsupported or unrecognized file format
    #[error("Cannot detect file format for '{name}'")]
    InvalidFileFormat { name: String },

    /// Requested sheet not found or spreadsheet is empty
    #[error("Sheet not found or spreadsheet is empty")]
    SheetNotFound,

    /// Sheet exists but contains no data
    #[error("Empty sheet or missing data")]
    EmptySheet,
}

/// Type alias for buffered file reader
pub type FileReader = BufReader<File>;

/// Wrapper enum for the supported spreadsheet format readers.
pub enum Spreadsheet {
    /// Excel 2007+ format reader (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<FileReader>),
    /// Excel Binary format reader (.xlsb)
    Xlsb(Xlsb<FileReader>),
    /// Legacy Excel format reader (.xls, .xla)
    Xls(Xls<FileReader>),
    /// OpenDocument format reader (.ods)
    Ods(Ods<FileReader>),
}

impl Spreadsheet {
    /// Opens a spreadsheet file, picking the reader from the file extension.
    pub fn open<P>(path: P) -> Result<Spreadsheet, SpreadsheetError>
    where
        P: AsRef<Path>,
    {
        let extension = path
            .as_ref()
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Self::Xlsx(open_workbook(path)?)),
            Some("xlsb") => Ok(Self::Xlsb(open_workbook(path)?)),
            Some("xls") | Some("xla") => Ok(Self::Xls(open_workbook(path)?)),
            Some("ods") => Ok(Self::Ods(open_workbook(path)?)),
            _ => Err(SpreadsheetError::InvalidFileFormat {
                name: path.as_ref().to_string_lossy().to_string(),
            }),
        }
    }

    /// Returns the names of all sheets in the spreadsheet.
    pub fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    /// Picks the first sheet whose name matches `pattern`, or the first
    /// sheet when no pattern is given.
    pub fn select_sheet(&self, pattern: Option<&Pattern>) -> Result<String, SpreadsheetError> {
        select_sheet(self.sheet_names(), pattern)
    }

    /// Reads the used cell range of a sheet.
    pub fn range(&mut self, sheet_name: &str) -> Result<Range<Data>, SpreadsheetError> {
        let range = match self {
            Self::Xlsx(xlsx) => xlsx.worksheet_range(sheet_name)?,
            Self::Xlsb(xlsb) => xlsb.worksheet_range(sheet_name)?,
            Self::Xls(xls) => xls.worksheet_range(sheet_name)?,
            Self::Ods(ods) => ods.worksheet_range(sheet_name)?,
        };
        if range.is_empty() {
            Err(SpreadsheetError::EmptySheet)
        } else {
            Ok(range)
        }
    }
}

/// First sheet name matching `pattern`, or the first sheet without one.
fn select_sheet(names: Vec<String>, pattern: Option<&Pattern>) -> Result<String, SpreadsheetError> {
    names
        .into_iter()
        .find(|name| pattern.map_or(true, |pattern| pattern.matches(name)))
        .ok_or(SpreadsheetError::SheetNotFound)
}

/// Reads the selected sheet of a spreadsheet file into a table.
pub(crate) fn read_table(path: &Path, pattern: Option<&Pattern>) -> Result<Table, LoadError> {
    let mut spreadsheet = Spreadsheet::open(path)?;
    let sheet_name = spreadsheet.select_sheet(pattern)?;
    debug!(sheet = sheet_name.as_str(), "reading sheet");
    let range = spreadsheet.range(&sheet_name)?;
    Ok(range_to_table(&range)?)
}

/// Converts a cell range into a table, using its first row as the header.
pub(crate) fn range_to_table(range: &Range<Data>) -> Result<Table, TableError> {
    let mut rows = range.rows();
    let names = unique_names(
        rows.next()
            .unwrap_or_default()
            .iter()
            .map(|cell| to_value(cell).to_string()),
    );

    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (column, cells) in values.iter_mut().enumerate() {
            cells.push(row.get(column).map_or(Value::Null, to_value));
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Table::new(columns)
}

/// Converts a workbook cell into a table value.
///
/// Integral floats become integers; error cells and empty strings are
/// missing values. Excel date serials below one day are times, whole days are
/// dates, anything else is a date-time.
fn to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Bool(value) => Value::Bool(*value),
        Data::Int(value) => Value::Int(*value),
        Data::Float(value) if is_integral(*value) => Value::Int(*value as i64),
        Data::Float(value) => Value::Float(*value),
        Data::String(value) if value.is_empty() => Value::Null,
        Data::String(value) => Value::Text(value.to_owned()),
        Data::DateTime(value) => {
            let serial = value.as_f64();
            match value.as_datetime() {
                Some(datetime) if serial < 1.0 => Value::Time(datetime.time()),
                Some(datetime) if serial.fract() == 0.0 => Value::Date(datetime.date()),
                Some(datetime) => Value::DateTime(datetime),
                None => Value::Float(serial),
            }
        }
        Data::DateTimeIso(value) => parse_iso(value),
        Data::DurationIso(value) => Value::Text(value.to_owned()),
    }
}

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

fn parse_iso(value: &str) -> Value {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Value::DateTime(datetime)
    } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Value::Date(date)
    } else if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M:%S%.f") {
        Value::Time(time)
    } else {
        Value::Text(value.to_owned())
    }
}
