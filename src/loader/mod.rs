//! # Table Loader
//!
//! Turns a file on disk into a [`Table`]. Spreadsheet files (recognized by
//! extension) are read through calamine; everything else is decoded with the
//! selected text encoding and parsed as delimited text with the selected
//! separator.
//!
//! Failures are reported as one of three [`LoadError`] kinds so the caller can
//! tell the user which option to change: the encoding, the separator, or
//! neither.
use crate::table::{Table, TableError};
use encoding_rs::Encoding;
use glob::Pattern;
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub(crate) mod delimited;
pub mod spreadsheet;

pub use spreadsheet::SpreadsheetError;

/// Literals read as missing values in delimited text.
pub const DEFAULT_NULLS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Categorized load failures.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The bytes cannot be decoded with the chosen encoding
    #[error("Encoding error: {message}. Try using a different encoding.")]
    Encoding { message: String },

    /// The text does not split consistently with the chosen separator
    #[error("Parsing error: {message}. Check if the selected separator [{separator}] matches the file structure.")]
    Parse {
        message: String,
        separator: Separator,
    },

    /// Anything else: I/O failures, empty input, unreadable workbooks
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        LoadError::Unexpected(error.to_string())
    }
}

impl From<SpreadsheetError> for LoadError {
    fn from(error: SpreadsheetError) -> Self {
        LoadError::Unexpected(error.to_string())
    }
}

impl From<TableError> for LoadError {
    fn from(error: TableError) -> Self {
        LoadError::Unexpected(error.to_string())
    }
}

/// Field separator for delimited text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Separator {
    #[default]
    Semicolon,
    Comma,
    Pipe,
    Tab,
}

impl Separator {
    pub const fn as_byte(&self) -> u8 {
        match self {
            Separator::Semicolon => b';',
            Separator::Comma => b',',
            Separator::Pipe => b'|',
            Separator::Tab => b'\t',
        }
    }
}

impl Display for Separator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Separator::Tab => f.write_str("\\t"),
            other => write!(f, "{}", other.as_byte() as char),
        }
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            ";" | "semicolon" => Ok(Separator::Semicolon),
            "," | "comma" => Ok(Separator::Comma),
            "|" | "pipe" => Ok(Separator::Pipe),
            "\t" | "\\t" | "tab" => Ok(Separator::Tab),
            _ => Err(format!(
                "unsupported separator '{value}', expected one of ; , | \\t"
            )),
        }
    }
}

/// Text encoding of delimited files.
///
/// Accepts any WHATWG encoding label (`utf-8`, `ISO-8859-1`, `latin1`,
/// `cp1252`, ...) and falls back to Windows code page numbers written as
/// `cpNNNN`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextEncoding {
    label: String,
    encoding: &'static Encoding,
}

impl TextEncoding {
    pub fn parse(label: &str) -> Option<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes()).or_else(|| {
            let lower = label.trim().to_ascii_lowercase();
            let code_page = lower.strip_prefix("cp")?.parse::<u16>().ok()?;
            codepage::to_encoding(code_page)
        })?;
        Some(TextEncoding {
            label: label.trim().to_owned(),
            encoding,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Bytes left undefined by the code page the label names.
    ///
    /// WHATWG windows-1252 maps every byte, but code page 1252 proper leaves
    /// five of them unassigned; files declared as `cp1252` must not contain
    /// them.
    pub fn undefined_bytes(&self) -> &'static [u8] {
        match self.label.to_ascii_lowercase().as_str() {
            "cp1252" | "windows-1252" => &CP1252_UNDEFINED,
            _ => &[],
        }
    }
}

const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding {
            label: "utf-8".to_owned(),
            encoding: encoding_rs::UTF_8,
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TextEncoding::parse(value).ok_or_else(|| format!("unknown encoding '{value}'"))
    }
}

/// Options controlling how a file is turned into a table.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Field separator for delimited text (ignored for spreadsheets)
    pub separator: Separator,
    /// Text encoding for delimited text (ignored for spreadsheets)
    pub encoding: TextEncoding,
    /// Sheet name pattern; the first sheet is used when absent
    pub sheet: Option<Pattern>,
    /// Literals treated as missing values in delimited text
    pub nulls: HashSet<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            separator: Separator::default(),
            encoding: TextEncoding::default(),
            sheet: None,
            nulls: DEFAULT_NULLS.iter().map(|null| null.to_string()).collect(),
        }
    }
}

/// Returns true when the file name carries a spreadsheet extension.
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
        .is_some_and(|extension| spreadsheet::EXTENSIONS.contains(&extension.as_str()))
}

/// Loads a table from `path` according to `options`.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    let table = if is_spreadsheet(path) {
        debug!(path = %path.display(), "reading spreadsheet");
        spreadsheet::read_table(path, options.sheet.as_ref())?
    } else {
        debug!(
            path = %path.display(),
            separator = %options.separator,
            encoding = options.encoding.label(),
            "reading delimited text"
        );
        let bytes = std::fs::read(path)?;
        delimited::read_table(&bytes, options)?
    };
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.columns().len(),
        "table loaded"
    );
    Ok(table)
}

/// Turns raw header cells into unique column names: empty headers become
/// `Unnamed: {index}` and repeated names get `.1`, `.2`, ... suffixes.
pub(crate) fn unique_names<I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut names: Vec<String> = Vec::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    for (index, header) in headers.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {index}")
        } else {
            header
        };
        let mut name = base.clone();
        while names.contains(&name) {
            let counter = counters.entry(base.clone()).or_insert(0);
            *counter += 1;
            name = format!("{base}.{counter}");
        }
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn separator_parse_and_display() {
        assert_eq!(";".parse::<Separator>(), Ok(Separator::Semicolon));
        assert_eq!("tab".parse::<Separator>(), Ok(Separator::Tab));
        assert_eq!("\t".parse::<Separator>(), Ok(Separator::Tab));
        assert!(":".parse::<Separator>().is_err());
        assert_eq!(Separator::Pipe.to_string(), "|");
        assert_eq!(Separator::Tab.to_string(), "\\t");
    }

    #[test]
    fn encoding_labels() {
        for label in ["utf-8", "ISO-8859-1", "latin1", "cp1252"] {
            assert!(TextEncoding::parse(label).is_some(), "{label}");
        }
        assert_eq!(
            TextEncoding::parse("latin1").unwrap().encoding(),
            encoding_rs::WINDOWS_1252
        );
        assert_eq!(
            TextEncoding::parse("cp936").unwrap().encoding(),
            encoding_rs::GBK
        );
        assert!(TextEncoding::parse("klingon").is_none());
    }

    #[test]
    fn cp1252_undefined_bytes() {
        assert_eq!(TextEncoding::parse("cp1252").unwrap().undefined_bytes(), &CP1252_UNDEFINED);
        assert_eq!(TextEncoding::parse("Windows-1252").unwrap().undefined_bytes(), &CP1252_UNDEFINED);
        assert!(TextEncoding::parse("latin1").unwrap().undefined_bytes().is_empty());
    }

    #[test]
    fn spreadsheet_extensions() {
        assert!(is_spreadsheet(Path::new("data/stations.xlsx")));
        assert!(is_spreadsheet(Path::new("STATIONS.XLS")));
        assert!(is_spreadsheet(Path::new("stations.ods")));
        assert!(!is_spreadsheet(Path::new("stations.csv")));
        assert!(!is_spreadsheet(Path::new("stations")));
    }

    #[test]
    fn unique_names_mangles() {
        let names = unique_names(
            ["a", "", "a", "b", "a"].iter().map(|header| header.to_string()),
        );
        assert_eq!(names, vec!["a", "Unnamed: 1", "a.1", "b", "a.2"]);
    }

    #[test]
    fn load_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "station;temp_c\nA;1.5\nB;2.0\n").unwrap();
        let table = load_table(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["station", "temp_c"]);
    }

    #[test]
    fn load_missing_file_is_unexpected() {
        let result = load_table(Path::new("no/such/file.csv"), &LoadOptions::default());
        assert!(matches!(result, Err(LoadError::Unexpected(_))));
    }

    const WORKSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
    const RELATIONSHIP_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    fn inline_row(row: usize, cells: &[&str]) -> String {
        let cells: String = cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                let reference = format!("{}{row}", (b'A' + column as u8) as char);
                match cell.parse::<f64>() {
                    Ok(_) => format!(r#"<c r="{reference}"><v>{cell}</v></c>"#),
                    Err(_) => format!(r#"<c r="{reference}" t="inlineStr"><is><t>{cell}</t></is></c>"#),
                }
            })
            .collect();
        format!(r#"<row r="{row}">{cells}</row>"#)
    }

    fn worksheet(rows: &[&[&str]]) -> String {
        let rows: String = rows
            .iter()
            .enumerate()
            .map(|(index, cells)| inline_row(index + 1, cells))
            .collect();
        format!(r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="{WORKSHEET_NS}"><sheetData>{rows}</sheetData></worksheet>"#)
    }

    /// Writes a minimal two-sheet workbook: "Metadata" then "Stations".
    fn stations_workbook() -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
        let options = zip::write::SimpleFileOptions::default();
        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_owned(),
            ),
            (
                "_rels/.rels",
                format!(r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{RELATIONSHIP_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#),
            ),
            (
                "xl/workbook.xml",
                format!(r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="{WORKSHEET_NS}" xmlns:r="{RELATIONSHIP_NS}"><sheets><sheet name="Metadata" sheetId="1" r:id="rId1"/><sheet name="Stations" sheetId="2" r:id="rId2"/></sheets></workbook>"#),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                format!(r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{RELATIONSHIP_NS}/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="{RELATIONSHIP_NS}/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#),
            ),
            ("xl/worksheets/sheet1.xml", worksheet(&[&["note"], &["survey"]])),
            (
                "xl/worksheets/sheet2.xml",
                worksheet(&[
                    &["station", "lat", "lon"],
                    &["A", "-45.1", "170.2"],
                    &["B", "-41", "174"],
                ]),
            ),
        ];
        for (name, content) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        file
    }

    #[test]
    fn load_first_sheet_of_workbook() {
        let file = stations_workbook();
        let table = load_table(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["note"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn load_sheet_by_pattern() {
        let file = stations_workbook();
        let options = LoadOptions {
            sheet: Some(Pattern::new("Stat*").unwrap()),
            ..LoadOptions::default()
        };
        let table = load_table(file.path(), &options).unwrap();

        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["station", "lat", "lon"]);
        assert_eq!(table.row_count(), 2);
        let lat = table.column("lat").unwrap();
        assert_eq!(lat.kind(), crate::table::ColumnType::Double);
        assert_eq!(lat.values()[1], crate::table::Value::Float(-41.0));
    }

    #[test]
    fn load_missing_sheet_is_unexpected() {
        let file = stations_workbook();
        let options = LoadOptions {
            sheet: Some(Pattern::new("Casts").unwrap()),
            ..LoadOptions::default()
        };
        match load_table(file.path(), &options) {
            Err(LoadError::Unexpected(message)) => assert!(message.contains("Sheet not found")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn load_broken_workbook_is_unexpected() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        write!(file, "this is not a zip archive").unwrap();
        let result = load_table(file.path(), &LoadOptions::default());
        assert!(matches!(result, Err(LoadError::Unexpected(_))));
    }
}
