use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_SAMPLE_ROWS;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Detect which columns of an ERP export hold article numbers, projects, quantities, dates and states",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify the columns of one or more exports and report the findings
    Classify(ClassifyArgs),
    /// Show the first rows of an export as a table
    Preview(PreviewArgs),
    /// Write only the pending order lines (remaining quantity above zero)
    Filter(FilterArgs),
    /// Write the built-in keyword table and rule settings as a YAML template
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Export files to analyse (csv, tsv, xlsx, xlsm, xls, xlsb, ods)
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// Label per input, in the same order (defaults to the file name)
    #[arg(long = "label", action = clap::ArgAction::Append)]
    pub labels: Vec<String>,
    /// YAML file overriding keyword sets or the fulfillment column
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Rows profiled per column (0 means full scan; defaults to the config value)
    #[arg(long)]
    pub sample_rows: Option<usize>,
    /// Worksheet to read from workbooks (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Report rendering
    #[arg(long, value_enum, default_value = "table")]
    pub format: ReportFormat,
    /// Write the report here instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Export file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
    /// Maximum characters per cell before truncation
    #[arg(long, default_value_t = 60)]
    pub width: usize,
    /// Worksheet to read from workbooks (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Export file holding order lines
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// YAML file overriding keyword sets or the fulfillment column
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Worksheet to read from workbooks (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// CSV delimiter character for reading input
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to comma)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of CSV inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Destination YAML file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Sample size recorded in the template
    #[arg(long, default_value_t = DEFAULT_SAMPLE_ROWS)]
    pub sample_rows: usize,
}

/// Accepts a named delimiter (`tab`, `comma`, `semicolon`, `pipe`) or any
/// single ASCII character.
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    let named = match value.to_ascii_lowercase().as_str() {
        "tab" | "\\t" => Some(b'\t'),
        "comma" => Some(b','),
        "semicolon" => Some(b';'),
        "pipe" => Some(b'|'),
        _ => None,
    };
    if let Some(delimiter) = named {
        return Ok(delimiter);
    }
    match value.as_bytes() {
        [] => Err("Delimiter cannot be empty".to_string()),
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("Delimiter '{value}' must be one ASCII character")),
    }
}
