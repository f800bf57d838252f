//! Builds a [`TabularDataset`] from a file on disk.
//!
//! Delimited text goes through the `csv` reader with `encoding_rs` decoding;
//! workbooks (`xlsx`, `xlsm`, `xls`, `xlsb`, `ods`) go through `calamine`.
//! Both paths share the same normalization: the first row is the header, blank
//! header cells become `Column_<n>`, rows are padded or cut to header width,
//! and rows without a single value are skipped.

use std::{fs::File, io::BufReader, path::Path};

use calamine::{Data, Reader, open_workbook_auto};
use chrono::Timelike;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use thiserror::Error;

use crate::{
    data::{Value, parse_cell},
    dataset::{DatasetError, Row, TabularDataset},
    io_utils,
};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];
const TEXT_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input file {0} does not exist")]
    NotFound(String),
    #[error("Opening {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported input format '{0}'")]
    UnsupportedFormat(String),
    #[error("Reading delimited text: {0}")]
    Read(#[from] io_utils::ReadError),
    #[error("Reading workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Workbook has no sheet named '{0}'")]
    MissingSheet(String),
    #[error("Workbook contains no sheets")]
    EmptyWorkbook,
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Overrides the file name as the dataset label.
    pub label: Option<String>,
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    /// Worksheet to read; defaults to the first one.
    pub sheet: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            label: None,
            delimiter: None,
            encoding: UTF_8,
            sheet: None,
        }
    }
}

pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<TabularDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let label = options.label.clone().unwrap_or_else(|| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    });

    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        load_workbook(path, label, options.sheet.as_deref())
    } else if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
        load_delimited(path, label, delimiter, options.encoding)
    } else {
        Err(LoadError::UnsupportedFormat(extension))
    }
}

fn load_delimited(
    path: &Path,
    label: String,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<TabularDataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = io_utils::DecodingReader::new(BufReader::new(file), delimiter, encoding);
    let columns = normalize_headers(reader.headers()?);

    let mut builder = RowBuilder::new(columns.len());
    while let Some(fields) = reader.next_record()? {
        builder.push(fields.iter().map(|raw| parse_cell(raw)).collect());
    }
    builder.finish(label, columns)
}

fn load_workbook(
    path: &Path,
    label: String,
    sheet: Option<&str>,
) -> Result<TabularDataset, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|candidate| candidate.as_str() == name)
            .cloned()
            .ok_or_else(|| LoadError::MissingSheet(name.to_string()))?,
        None => sheet_names.first().cloned().ok_or(LoadError::EmptyWorkbook)?,
    };
    debug!("Reading sheet '{sheet_name}' from {path:?}");
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(TabularDataset::new(label, Vec::new(), Vec::new())?);
    };
    let columns = normalize_headers(header_row.iter().map(|cell| cell.to_string()).collect());

    let mut builder = RowBuilder::new(columns.len());
    for row in rows {
        builder.push(row.iter().map(cell_to_value).collect());
    }
    builder.finish(label, columns)
}

fn cell_to_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::Int(i) => Some(Value::Number(*i as f64)),
        Data::Float(f) => Some(Value::Number(*f)),
        Data::Bool(b) => Some(Value::Text(b.to_string())),
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Value::Text(trimmed.to_string()))
        }
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.num_seconds_from_midnight() == 0 => {
                Some(Value::Date(datetime.date()))
            }
            Some(datetime) => Some(Value::DateTime(datetime)),
            None => Some(Value::Number(dt.as_f64())),
        },
        Data::DateTimeIso(s) => parse_cell(s),
        Data::DurationIso(s) => Some(Value::Text(s.clone())),
        Data::Error(err) => Some(Value::Text(err.to_string())),
    }
}

/// Trims header names and names blank ones `Column_<n>` (1-based).
pub fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let trimmed = header.trim();
            if trimmed.is_empty() {
                format!("Column_{}", idx + 1)
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

struct RowBuilder {
    width: usize,
    rows: Vec<Row>,
    truncated: usize,
    blank: usize,
}

impl RowBuilder {
    fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            truncated: 0,
            blank: 0,
        }
    }

    fn push(&mut self, mut row: Row) {
        if row.iter().all(Option::is_none) {
            self.blank += 1;
            return;
        }
        if row.len() > self.width {
            if row[self.width..].iter().any(Option::is_some) {
                self.truncated += 1;
            }
            row.truncate(self.width);
        }
        row.resize(self.width, None);
        self.rows.push(row);
    }

    fn finish(self, label: String, columns: Vec<String>) -> Result<TabularDataset, LoadError> {
        if self.truncated > 0 {
            warn!(
                "{label}: {} row(s) had values beyond the {} header column(s); extra cells were dropped",
                self.truncated, self.width
            );
        }
        if self.blank > 0 {
            debug!("{label}: skipped {} blank row(s)", self.blank);
        }
        Ok(TabularDataset::new(label, columns, self.rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_headers_get_positional_names() {
        let headers = vec![" Artikel ".to_string(), String::new(), "  ".to_string()];
        assert_eq!(
            normalize_headers(headers),
            vec!["Artikel", "Column_2", "Column_3"]
        );
    }

    #[test]
    fn row_builder_pads_truncates_and_skips_blank_rows() {
        let mut builder = RowBuilder::new(2);
        builder.push(vec![Some(Value::Number(1.0))]);
        builder.push(vec![None, None, None]);
        builder.push(vec![
            Some(Value::Number(2.0)),
            None,
            Some(Value::Text("spill".into())),
        ]);
        let dataset = builder
            .finish("t".to_string(), vec!["a".into(), "b".into()])
            .unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.rows()[0], vec![Some(Value::Number(1.0)), None]);
        assert_eq!(dataset.rows()[1].len(), 2);
    }

    #[test]
    fn workbook_cells_map_to_values() {
        assert_eq!(cell_to_value(&Data::Empty), None);
        assert_eq!(cell_to_value(&Data::Int(3)), Some(Value::Number(3.0)));
        assert_eq!(
            cell_to_value(&Data::String("  ".to_string())),
            None
        );
        assert_eq!(
            cell_to_value(&Data::Bool(true)),
            Some(Value::Text("true".to_string()))
        );
    }
}
