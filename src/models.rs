//! Data models for capture processing.
//!
//! This module contains the core data structures that flow through the
//! pipeline: file categories, parsed rows, per-column statistics and
//! the per-file and per-run summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of capture file, inferred from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// `top`-style process table
    Processes,
    /// `iostat`-style per-device table
    Disk,
    /// CPU utilisation samples
    Cpu,
    /// Memory samples
    Mem,
    /// Anything else; header is taken verbatim from the file
    Generic,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Processes => write!(f, "processes"),
            Category::Disk => write!(f, "disk"),
            Category::Cpu => write!(f, "cpu"),
            Category::Mem => write!(f, "mem"),
            Category::Generic => write!(f, "generic"),
        }
    }
}

impl Category {
    /// Resolve the category from a file name by substring.
    ///
    /// `processes` wins over `disk`, which wins over `cpu` and `mem`.
    pub fn from_file_name(name: &str) -> Self {
        if name.contains("processes") {
            Category::Processes
        } else if name.contains("disk") {
            Category::Disk
        } else if name.contains("cpu") {
            Category::Cpu
        } else if name.contains("mem") {
            Category::Mem
        } else {
            Category::Generic
        }
    }

    /// Synthetic header line inserted when the file lacks one.
    pub fn header_template(&self) -> Option<&'static str> {
        match self {
            Category::Processes => Some(
                "Time\tPM\t PID\t USER\tPR\tNI\t VIRT\tRES\tSHR\tS\t%CPU\t%MEM\tTIME\tProcess\n",
            ),
            Category::Disk => Some(
                "Time\tPM\tDEV\t tps\trkB/s\twkB/s\tdkB/s\tareq-sz\t aqu-sz\tawait\t %util\n",
            ),
            _ => None,
        }
    }

    /// Token whose presence on the first line means a header already exists.
    ///
    /// The disk token does not match the disk template, so disk files are
    /// re-headed on every run unless the capture itself carries `Filesystem`.
    pub fn sniff_token(&self) -> Option<&'static str> {
        match self {
            Category::Processes => Some("PID"),
            Category::Disk => Some("Filesystem"),
            _ => None,
        }
    }
}

/// A capture file discovered in the input directory.
#[derive(Debug, Clone)]
pub struct CaptureFile {
    /// Full path to the file.
    pub path: std::path::PathBuf,
    /// File name, used to name the CSV and report outputs.
    pub name: String,
    /// Category resolved once from the file name.
    pub category: Category,
}

/// Column names of a capture, with the synthetic `timestamp` column first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRow(pub Vec<String>);

impl HeaderRow {
    /// Name of the column at `index`, if the header is that wide.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// One data line after timestamp reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRow(pub Vec<String>);

impl DataRow {
    /// The merged `date time-of-day` field.
    #[allow(dead_code)] // Accessor used by tests and debug output
    pub fn timestamp(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

/// Max/min/average of one column's accumulated samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub max: f64,
    pub min: f64,
    pub avg: f64,
    /// Number of samples the statistics were computed from.
    pub samples: usize,
}

/// Statistics for a single named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub name: String,
    #[serde(flatten)]
    pub stats: ColumnStats,
}

/// Complete report for one capture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Original file name (not the full path).
    pub file: String,
    /// Resolved category.
    pub category: Category,
    /// Number of data rows written to the CSV sink.
    pub rows: usize,
    /// Columns in first-seen order; columns without samples are absent.
    pub columns: Vec<ColumnReport>,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
}

impl FileReport {
    /// Look up a column's statistics by name.
    #[allow(dead_code)] // Lookup helper used by tests
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.stats)
    }
}

/// Outcome of processing one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file: String,
    pub category: Category,
    pub header_inserted: bool,
    pub rows: usize,
    pub columns_reported: usize,
}

/// Totals across a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files_processed: usize,
    pub headers_inserted: usize,
    pub rows_emitted: usize,
    pub columns_reported: usize,
    pub files: Vec<FileOutcome>,
}

impl RunSummary {
    /// Fold a file outcome into the totals.
    pub fn record(&mut self, outcome: FileOutcome) {
        self.files_processed += 1;
        if outcome.header_inserted {
            self.headers_inserted += 1;
        }
        self.rows_emitted += outcome.rows;
        self.columns_reported += outcome.columns_reported;
        self.files.push(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_file_name() {
        assert_eq!(
            Category::from_file_name("host1_processes.log"),
            Category::Processes
        );
        assert_eq!(Category::from_file_name("disk_io.txt"), Category::Disk);
        assert_eq!(Category::from_file_name("cpu.log"), Category::Cpu);
        assert_eq!(Category::from_file_name("mem_usage"), Category::Mem);
        assert_eq!(Category::from_file_name("network.log"), Category::Generic);
    }

    #[test]
    fn test_category_priority() {
        assert_eq!(
            Category::from_file_name("disk_processes.log"),
            Category::Processes
        );
        assert_eq!(Category::from_file_name("cpu_disk.log"), Category::Disk);
    }

    #[test]
    fn test_header_templates() {
        let procs = Category::Processes.header_template().unwrap();
        assert!(procs.starts_with("Time\tPM\t PID"));
        assert!(procs.ends_with("Process\n"));

        let disk = Category::Disk.header_template().unwrap();
        assert!(disk.starts_with("Time\tPM\tDEV"));
        assert!(disk.ends_with("%util\n"));

        assert!(Category::Cpu.header_template().is_none());
        assert!(Category::Generic.sniff_token().is_none());
    }

    #[test]
    fn test_disk_sniff_token_does_not_match_template() {
        // Known quirk: the disk check looks for a token its own template lacks.
        let template = Category::Disk.header_template().unwrap();
        let token = Category::Disk.sniff_token().unwrap();
        assert!(!template.contains(token));
    }

    #[test]
    fn test_run_summary_record() {
        let mut summary = RunSummary::default();
        summary.record(FileOutcome {
            file: "a_processes".to_string(),
            category: Category::Processes,
            header_inserted: true,
            rows: 10,
            columns_reported: 4,
        });
        summary.record(FileOutcome {
            file: "b_cpu".to_string(),
            category: Category::Cpu,
            header_inserted: false,
            rows: 3,
            columns_reported: 2,
        });

        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.headers_inserted, 1);
        assert_eq!(summary.rows_emitted, 13);
        assert_eq!(summary.columns_reported, 6);
    }
}
