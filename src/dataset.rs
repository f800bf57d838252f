//! In-memory representation of one loaded export.
//!
//! A [`TabularDataset`] is the only input the classifier and rule engine see.
//! It is built once by a loader and never mutated afterwards. Column names are
//! not required to be unique, so every lookup in this crate is positional.

use thiserror::Error;

use crate::data::Value;

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("Row {row} has {found} value(s) but the header declares {expected} column(s)")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabularDataset {
    label: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl TabularDataset {
    /// Builds a dataset, rejecting any row whose width differs from the header.
    /// Row numbers in errors are 1-based data rows.
    pub fn new(
        label: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Row>,
    ) -> Result<Self, DatasetError> {
        let expected = columns.len();
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
        {
            return Err(DatasetError::RowWidth {
                row: idx + 1,
                expected,
                found: row.len(),
            });
        }
        Ok(Self {
            label: label.into(),
            columns,
            rows,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of the column at `index` in row order, nulls included.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|v| v.as_ref()))
    }

    /// Copy of this dataset holding only the rows `keep` accepts.
    pub fn retain_rows<F>(&self, mut keep: F) -> TabularDataset
    where
        F: FnMut(&Row) -> bool,
    {
        TabularDataset {
            label: self.label.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }
}
