//! Column aggregation over parsed capture rows.
//!
//! Every token that parses as a float is appended to the sequence of the
//! column it sits under. Categorical tokens (user names, process states,
//! the timestamp) are skipped without complaint.

use crate::capture::ParsedCapture;
use crate::models::{DataRow, HeaderRow};
use std::collections::HashMap;

/// Numeric samples per column, kept in first-seen column order.
#[derive(Debug, Clone, Default)]
pub struct ColumnAccumulator {
    columns: Vec<(String, Vec<f64>)>,
    index: HashMap<String, usize>,
}

impl ColumnAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate every row of a parsed capture.
    pub fn from_capture(capture: &ParsedCapture) -> Self {
        let mut acc = Self::new();
        if let Some(ref header) = capture.header {
            for row in &capture.rows {
                acc.add_row(header, row);
            }
        }
        acc
    }

    /// Accumulate the numeric tokens of one row.
    ///
    /// Tokens beyond the header width have no column and are skipped.
    pub fn add_row(&mut self, header: &HeaderRow, row: &DataRow) {
        for (i, token) in row.fields().iter().enumerate() {
            let Some(value) = parse_numeric(token) else {
                continue;
            };
            let Some(name) = header.name(i) else {
                continue;
            };
            self.push(name, value);
        }
    }

    /// Record `value` for `column`.
    ///
    /// A zero arriving while the column has no samples yet is a warm-up
    /// placeholder and is dropped; zeros after the first real sample are kept.
    pub fn push(&mut self, column: &str, value: f64) {
        let slot = match self.index.get(column) {
            Some(&slot) => slot,
            None => {
                self.columns.push((column.to_string(), Vec::new()));
                self.index.insert(column.to_string(), self.columns.len() - 1);
                self.columns.len() - 1
            }
        };

        let samples = &mut self.columns[slot].1;
        if samples.is_empty() && value == 0.0 {
            return;
        }
        samples.push(value);
    }

    /// Samples recorded for a column, if it has ever seen a numeric token.
    #[allow(dead_code)] // Lookup helper used by tests
    pub fn samples(&self, column: &str) -> Option<&[f64]> {
        self.index
            .get(column)
            .map(|&slot| self.columns[slot].1.as_slice())
    }

    /// Columns in first-seen order, including ones with no samples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(|(name, samples)| (name.as_str(), samples.as_slice()))
    }

    #[allow(dead_code)] // Pairs with iter()
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Parse a token as a float, treating NaN as non-numeric.
pub fn parse_numeric(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| !v.is_nan())
}
