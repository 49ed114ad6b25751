//! Snapshot parsing for capture files.
//!
//! A capture is a sequence of snapshots separated by kernel banner lines
//! and blank lines. The first surviving line is the column header; every
//! other line is a data line whose first two tokens (time of day and
//! AM/PM marker) are folded into a single timestamp field.

use crate::error::CaptureError;
use crate::models::{Category, DataRow, HeaderRow};
use std::io::Write;
use tracing::debug;

/// Name of the synthetic first column.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Options controlling line classification.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Lines starting with this prefix are banner lines and are dropped.
    pub banner_prefix: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            banner_prefix: "Linux".to_string(),
        }
    }
}

impl From<&crate::config::ParserConfig> for ParseOptions {
    fn from(config: &crate::config::ParserConfig) -> Self {
        Self {
            banner_prefix: config.banner_prefix.clone(),
        }
    }
}

/// A capture split into its header and data rows.
#[derive(Debug, Clone)]
pub struct ParsedCapture {
    pub category: Category,
    /// `None` when every line was a banner or blank.
    pub header: Option<HeaderRow>,
    /// Data rows in input order.
    pub rows: Vec<DataRow>,
    /// Banner and blank lines dropped.
    pub ignored_lines: usize,
    /// Data lines dropped for having fewer than two tokens.
    pub malformed_lines: usize,
}

impl ParsedCapture {
    fn empty(category: Category) -> Self {
        Self {
            category,
            header: None,
            rows: Vec::new(),
            ignored_lines: 0,
            malformed_lines: 0,
        }
    }
}

/// Parse the full text of a capture.
pub fn parse_capture(content: &str, category: Category, options: &ParseOptions) -> ParsedCapture {
    let mut parsed = ParsedCapture::empty(category);

    for line in content.lines() {
        if is_ignored(line, options) {
            parsed.ignored_lines += 1;
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();

        if parsed.header.is_none() {
            parsed.header = Some(header_from_tokens(&tokens));
            continue;
        }

        match row_from_tokens(&tokens) {
            Some(row) => parsed.rows.push(row),
            None => parsed.malformed_lines += 1,
        }
    }

    debug!(
        "Parsed {} capture: {} columns, {} rows, {} ignored, {} malformed",
        category,
        parsed.header.as_ref().map(HeaderRow::len).unwrap_or(0),
        parsed.rows.len(),
        parsed.ignored_lines,
        parsed.malformed_lines
    );

    parsed
}

/// Banner lines and blank lines carry no columns.
fn is_ignored(line: &str, options: &ParseOptions) -> bool {
    line.starts_with(options.banner_prefix.as_str()) || line.trim().is_empty()
}

/// Drop the time and AM/PM tokens and lead with `timestamp`.
fn header_from_tokens(tokens: &[&str]) -> HeaderRow {
    let names = std::iter::once(TIMESTAMP_COLUMN)
        .chain(tokens.iter().skip(2).copied())
        .map(String::from)
        .collect();

    HeaderRow(names)
}

/// Merge the first two tokens into one timestamp field.
///
/// Returns `None` for truncated lines with fewer than two tokens.
fn row_from_tokens(tokens: &[&str]) -> Option<DataRow> {
    let [date, period, rest @ ..] = tokens else {
        return None;
    };

    let mut fields = Vec::with_capacity(rest.len() + 1);
    fields.push(format!("{} {}", date, period));
    fields.extend(rest.iter().map(|t| t.to_string()));

    Some(DataRow(fields))
}

/// Write the header and rows as comma-separated records.
///
/// Rows are written as-is even when their width differs from the header.
pub fn write_csv<W: Write>(capture: &ParsedCapture, writer: W) -> Result<(), CaptureError> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    if let Some(ref header) = capture.header {
        wtr.write_record(header.as_slice())?;
    }

    for row in &capture.rows {
        wtr.write_record(row.fields())?;
    }

    wtr.flush().map_err(csv::Error::from)?;

    Ok(())
}
