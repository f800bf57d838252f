//! Byte-level CSV plumbing shared by the loader and the `filter` writer.
//!
//! Exports from Windows ERP hosts are often `windows-1252`, so records are read
//! as raw bytes and decoded with `encoding_rs` field by field. A `.tsv`
//! extension selects tab as the delimiter unless one is given explicitly.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::{ByteRecord, QuoteStyle};
use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;

pub const COMMA: u8 = b',';
pub const TAB: u8 = b'\t';

#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Line {line} is not valid {encoding}")]
    Encoding { line: u64, encoding: &'static str },
}

/// `-` stands for stdout.
pub fn is_dash(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    let Some(label) = label else {
        return Ok(UTF_8);
    };
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| anyhow!("Unknown encoding '{label}'"))
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    if let Some(delimiter) = provided {
        return delimiter;
    }
    let is_tsv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_tsv { TAB } else { COMMA }
}

/// CSV reader that hands out records already decoded to UTF-8.
///
/// The underlying reader is flexible: rows shorter or longer than the header
/// are returned as they are and normalized by the caller.
pub struct DecodingReader<R: Read> {
    inner: csv::Reader<R>,
    encoding: &'static Encoding,
    record: ByteRecord,
}

impl<R: Read> DecodingReader<R> {
    pub fn new(source: R, delimiter: u8, encoding: &'static Encoding) -> Self {
        let inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(source);
        Self {
            inner,
            encoding,
            record: ByteRecord::new(),
        }
    }

    pub fn headers(&mut self) -> Result<Vec<String>, ReadError> {
        let headers = self.inner.byte_headers()?.clone();
        self.decode(&headers)
    }

    /// Next data record, or `None` once the input is exhausted.
    pub fn next_record(&mut self) -> Result<Option<Vec<String>>, ReadError> {
        if !self.inner.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        let record = self.record.clone();
        self.decode(&record).map(Some)
    }

    fn decode(&self, record: &ByteRecord) -> Result<Vec<String>, ReadError> {
        record
            .iter()
            .map(|field| {
                let (text, had_errors) = self.encoding.decode_without_bom_handling(field);
                if had_errors {
                    Err(ReadError::Encoding {
                        line: record.position().map_or(0, |pos| pos.line()),
                        encoding: self.encoding.name(),
                    })
                } else {
                    Ok(text.into_owned())
                }
            })
            .collect()
    }
}

/// UTF-8 CSV writer on `path`, or on stdout when `path` is absent or `-`.
pub fn open_csv_writer(
    path: Option<&Path>,
    delimiter: u8,
) -> Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) if !is_dash(path) => {
            let file = File::create(path).with_context(|| format!("Creating {path:?}"))?;
            Box::new(BufWriter::new(file))
        }
        _ => Box::new(std::io::stdout()),
    };
    Ok(csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn delimiter_follows_extension_unless_overridden() {
        assert_eq!(resolve_input_delimiter(&PathBuf::from("a.TSV"), None), b'\t');
        assert_eq!(resolve_input_delimiter(&PathBuf::from("a.csv"), None), b',');
        assert_eq!(
            resolve_input_delimiter(&PathBuf::from("a.tsv"), Some(b';')),
            b';'
        );
    }

    #[test]
    fn resolve_encoding_rejects_unknown_labels() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(
            resolve_encoding(Some(" latin1 ")).unwrap().name(),
            "windows-1252"
        );
        assert!(resolve_encoding(Some("klingon")).is_err());
    }

    #[test]
    fn decoding_reader_yields_records_until_exhausted() {
        let input = "Artikel;Menge\nA1;4\nA2\n".as_bytes();
        let mut reader = DecodingReader::new(input, b';', UTF_8);
        assert_eq!(reader.headers().unwrap(), vec!["Artikel", "Menge"]);
        assert_eq!(
            reader.next_record().unwrap(),
            Some(vec!["A1".to_string(), "4".to_string()])
        );
        assert_eq!(reader.next_record().unwrap(), Some(vec!["A2".to_string()]));
        assert_eq!(reader.next_record().unwrap(), None);
    }

    #[test]
    fn invalid_bytes_report_their_line() {
        let input: &[u8] = b"Artikel\nA1\n\xff\xfe\n";
        let mut reader = DecodingReader::new(input, b',', UTF_8);
        reader.headers().unwrap();
        reader.next_record().unwrap();
        match reader.next_record() {
            Err(ReadError::Encoding { line, encoding }) => {
                assert_eq!(line, 3);
                assert_eq!(encoding, "UTF-8");
            }
            other => panic!("expected encoding error, got {other:?}"),
        }
    }

    #[test]
    fn byte_order_marks_inside_fields_are_not_reinterpreted() {
        let input: &[u8] = b"Artikel,Menge\n\xff\xfeA1,5\n";
        let mut reader = DecodingReader::new(input, b',', UTF_8);
        reader.headers().unwrap();
        assert!(matches!(
            reader.next_record(),
            Err(ReadError::Encoding { line: 2, .. })
        ));

        let mut latin = DecodingReader::new(input, b',', encoding_rs::WINDOWS_1252);
        latin.headers().unwrap();
        assert_eq!(
            latin.next_record().unwrap(),
            Some(vec!["ÿþA1".to_string(), "5".to_string()])
        );
    }

    #[test]
    fn dash_means_stdout() {
        assert!(is_dash(Path::new("-")));
        assert!(!is_dash(Path::new("report.csv")));
    }
}
