//! Column statistics report generation.
//!
//! This module reduces accumulated column samples into max/min/average
//! statistics and renders them as a plain-text or JSON report.

use crate::analysis::ColumnAccumulator;
use crate::cli::ReportFormat;
use crate::error::CaptureError;
use crate::models::{Category, ColumnReport, ColumnStats, FileReport};
use anyhow::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Compute statistics for one column, or `None` if it has no samples.
pub fn compute_stats(samples: &[f64]) -> Option<ColumnStats> {
    let (&first, rest) = samples.split_first()?;

    let (max, min) = rest
        .iter()
        .fold((first, first), |(max, min), &v| (max.max(v), min.min(v)));
    let sum: f64 = samples.iter().sum();

    Some(ColumnStats {
        max,
        min,
        avg: sum / samples.len() as f64,
        samples: samples.len(),
    })
}

/// Reduce an accumulator to per-column statistics.
///
/// Columns without samples are omitted; the rest keep accumulator order.
pub fn calculate_report(acc: &ColumnAccumulator) -> Vec<ColumnReport> {
    acc.iter()
        .filter_map(|(name, samples)| {
            compute_stats(samples).map(|stats| ColumnReport {
                name: name.to_string(),
                stats,
            })
        })
        .collect()
}

/// Build the complete report for one capture file.
pub fn build_file_report(
    file: &str,
    category: Category,
    rows: usize,
    acc: &ColumnAccumulator,
) -> FileReport {
    FileReport {
        file: file.to_string(),
        category,
        rows,
        columns: calculate_report(acc),
        generated_at: Utc::now(),
    }
}

/// Format a value the way the report prints it.
///
/// Uses the shortest representation that round-trips, always with a
/// fractional part (`12.0`, not `12`). No rounding is applied.
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

/// Generate the plain-text report.
///
/// One block per column, each followed by a blank line. A report with no
/// columns is empty.
pub fn generate_text_report(report: &FileReport) -> String {
    let mut output = String::new();

    for column in &report.columns {
        output.push_str(&generate_column_block(column));
    }

    output
}

/// Generate the text block for a single column.
fn generate_column_block(column: &ColumnReport) -> String {
    let mut block = String::new();

    block.push_str(&column.name);
    block.push('\n');
    block.push_str(&format!("Max: {}\n", format_value(column.stats.max)));
    block.push_str(&format!("Min: {}\n", format_value(column.stats.min)));
    block.push_str(&format!("Avg: {}\n\n", format_value(column.stats.avg)));

    block
}

/// Generate a JSON report.
pub fn generate_json_report(report: &FileReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Path of the report for `file` inside `results_dir`.
pub fn report_path(results_dir: &Path, file: &str, format: ReportFormat) -> PathBuf {
    match format {
        ReportFormat::Text => results_dir.join(format!("{}_report.txt", file)),
        ReportFormat::Json => results_dir.join(format!("{}_report.json", file)),
    }
}

/// Render and write the report into `results_dir`.
pub fn write_report(report: &FileReport, results_dir: &Path, format: ReportFormat) -> Result<PathBuf> {
    let content = match format {
        ReportFormat::Text => generate_text_report(report),
        ReportFormat::Json => generate_json_report(report)?,
    };

    let path = report_path(results_dir, &report.file, format);
    std::fs::write(&path, content).map_err(|e| CaptureError::write(&path, e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_report() -> FileReport {
        let mut acc = ColumnAccumulator::new();
        for v in [1.0, 3.0, 2.0] {
            acc.push("%CPU", v);
        }
        for v in [0.0, 0.0] {
            acc.push("NI", v);
        }
        for v in [0.1, 0.2] {
            acc.push("%MEM", v);
        }

        build_file_report("host_processes", Category::Processes, 3, &acc)
    }

    #[test]
    fn test_compute_stats() {
        let stats = compute_stats(&[4.0, -1.0, 7.5, 2.0]).unwrap();
        assert_eq!(stats.max, 7.5);
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.avg, 12.5 / 4.0);
        assert_eq!(stats.samples, 4);

        assert!(compute_stats(&[]).is_none());
    }

    #[test]
    fn test_avg_is_not_rounded() {
        let samples = [0.1, 0.2];
        let stats = compute_stats(&samples).unwrap();

        assert_eq!(stats.avg, (0.1 + 0.2) / 2.0);
        assert_eq!(format_value(stats.avg), "0.15000000000000002");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(12.0), "12.0");
        assert_eq!(format_value(1.5), "1.5");
        assert_eq!(format_value(-0.25), "-0.25");
    }

    #[test]
    fn test_empty_columns_omitted() {
        let report = create_test_report();

        let names: Vec<_> = report.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["%CPU", "%MEM"]);
        assert!(report.column("NI").is_none());
    }

    #[test]
    fn test_generate_text_report() {
        let report = create_test_report();
        let text = generate_text_report(&report);

        assert_eq!(
            text,
            "%CPU\nMax: 3.0\nMin: 1.0\nAvg: 2.0\n\n\
             %MEM\nMax: 0.2\nMin: 0.1\nAvg: 0.15000000000000002\n\n"
        );
    }

    #[test]
    fn test_text_report_with_no_columns_is_empty() {
        let report = build_file_report("cpu", Category::Cpu, 0, &ColumnAccumulator::new());
        assert_eq!(generate_text_report(&report), "");
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"file\": \"host_processes\""));
        assert!(json.contains("\"category\": \"processes\""));
        assert!(json.contains("\"name\": \"%CPU\""));
        assert!(json.contains("\"avg\""));
        assert!(json.contains("\"samples\": 3"));
    }

    #[test]
    fn test_write_report_paths() {
        let dir = TempDir::new().unwrap();
        let report = create_test_report();

        let text_path = write_report(&report, dir.path(), ReportFormat::Text).unwrap();
        assert_eq!(text_path, dir.path().join("host_processes_report.txt"));
        assert!(std::fs::read_to_string(&text_path).unwrap().starts_with("%CPU\n"));

        let json_path = write_report(&report, dir.path(), ReportFormat::Json).unwrap();
        assert_eq!(json_path, dir.path().join("host_processes_report.json"));
    }
}
