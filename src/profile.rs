//! Advisory value profiles for candidate columns.
//!
//! Profiles help a person reviewing a report judge whether a candidate really
//! plays its role. They are never consulted when ranking candidates.

use std::collections::HashSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{data::Value, dataset::TabularDataset};

pub const DISTINCT_PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnProfile {
    /// Rows inspected (the sample, not necessarily the whole dataset).
    pub rows_sampled: usize,
    pub non_null: usize,
    pub distinct: usize,
    pub sample: Option<String>,
    pub distinct_preview: Vec<String>,
    /// Present only when every non-null sampled value is a number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
}

impl ColumnProfile {
    pub fn is_numeric(&self) -> bool {
        self.numeric.is_some()
    }
}

/// Profiles the column at `index` over the first `sample_rows` rows
/// (0 means all rows).
pub fn profile_column(dataset: &TabularDataset, index: usize, sample_rows: usize) -> ColumnProfile {
    let limit = if sample_rows == 0 {
        dataset.row_count()
    } else {
        sample_rows.min(dataset.row_count())
    };
    let mut accumulator = ProfileAccumulator::default();
    for value in dataset.column_values(index).take(limit) {
        accumulator.ingest(value);
    }
    accumulator.finish(limit)
}

#[derive(Default)]
struct ProfileAccumulator {
    non_null: usize,
    rendered: Vec<String>,
    all_numeric: bool,
    numeric_seen: bool,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl ProfileAccumulator {
    fn ingest(&mut self, value: Option<&Value>) {
        let Some(value) = value else {
            return;
        };
        if self.non_null == 0 {
            self.all_numeric = true;
        }
        self.non_null += 1;
        self.rendered.push(value.as_display());
        match value.as_number() {
            Some(number) => {
                self.numeric_seen = true;
                self.sum += number;
                self.min = Some(self.min.map_or(number, |current| current.min(number)));
                self.max = Some(self.max.map_or(number, |current| current.max(number)));
            }
            None => self.all_numeric = false,
        }
    }

    fn finish(self, rows_sampled: usize) -> ColumnProfile {
        let distinct = self.rendered.iter().collect::<HashSet<_>>().len();
        let distinct_preview = self
            .rendered
            .iter()
            .unique()
            .take(DISTINCT_PREVIEW_LIMIT)
            .cloned()
            .collect();
        let numeric = match (self.all_numeric && self.numeric_seen, self.min, self.max) {
            (true, Some(min), Some(max)) => Some(NumericSummary {
                count: self.non_null,
                min,
                max,
                mean: self.sum / self.non_null as f64,
            }),
            _ => None,
        };
        ColumnProfile {
            rows_sampled,
            non_null: self.non_null,
            distinct,
            sample: self.rendered.first().cloned(),
            distinct_preview,
            numeric,
        }
    }
}
