use clap::{Parser, ValueEnum};
use glob::Pattern;
use rusty_quality::loader::{LoadOptions, Separator, TextEncoding};
use rusty_quality::validate::TemporalFormat;
use std::path::PathBuf;

/// Check a CSV or spreadsheet file for common data quality problems
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// CSV, TSV or spreadsheet file to check
    #[arg(required_unless_present = "guidelines")]
    pub file: Option<PathBuf>,

    /// Field separator for delimited text: ; , | or tab
    #[arg(short, long, default_value = ";")]
    pub separator: Separator,

    /// Text encoding for delimited text (utf-8, ISO-8859-1, latin1, cp1252, ...)
    #[arg(short, long, default_value = "utf-8")]
    pub encoding: TextEncoding,

    /// Sheet name (glob pattern) to read from a spreadsheet; defaults to the first sheet
    #[arg(long)]
    pub sheet: Option<Pattern>,

    /// Extra literal to treat as a missing value (repeatable)
    #[arg(long = "null", value_name = "LITERAL", allow_hyphen_values = true)]
    pub nulls: Vec<String>,

    /// Regular expression replacing the ISO 8601 date pattern
    #[arg(long)]
    pub date_pattern: Option<String>,

    /// Regular expression replacing the ISO 8601 time pattern
    #[arg(long)]
    pub time_pattern: Option<String>,

    /// Write the coordinate map as an HTML page
    #[arg(short, long, value_name = "HTML")]
    pub map: Option<PathBuf>,

    /// Report output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the data formatting recommendations
    #[arg(long)]
    pub guidelines: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    pub fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions {
            separator: self.separator,
            encoding: self.encoding.clone(),
            sheet: self.sheet.clone(),
            ..LoadOptions::default()
        };
        options.nulls.extend(self.nulls.iter().cloned());
        options
    }

    pub fn date_format(&self) -> TemporalFormat {
        match &self.date_pattern {
            Some(pattern) => TemporalFormat::date().with_pattern(pattern),
            None => TemporalFormat::date(),
        }
    }

    pub fn time_format(&self) -> TemporalFormat {
        match &self.time_pattern {
            Some(pattern) => TemporalFormat::time().with_pattern(pattern),
            None => TemporalFormat::time(),
        }
    }
}
