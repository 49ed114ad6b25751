//! Capture file handling.
//!
//! This module turns raw monitor captures into header-aligned rows:
//! the header normalizer makes sure line one is a column header, and the
//! snapshot parser splits the capture into a header row and data rows.

pub mod header;
pub mod parser;

pub use header::normalize_header;
pub use parser::{parse_capture, write_csv, ParseOptions, ParsedCapture};
