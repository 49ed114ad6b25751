//! Per-file processing pipeline.
//!
//! Each capture goes through the same stages, start to finish, before the
//! next one is opened:
//!
//! ```text
//! Unopened -> HeaderChecked -> Parsing -> RowsEmitted -> Aggregated -> Reported -> Done
//! ```
//!
//! Nothing is shared between files; any I/O failure aborts the run.

use crate::analysis::ColumnAccumulator;
use crate::capture::{normalize_header, parse_capture, write_csv, ParseOptions};
use crate::cli::ReportFormat;
use crate::error::CaptureError;
use crate::models::{CaptureFile, FileOutcome, RunSummary};
use crate::report::{build_file_report, write_report};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Processing stage of a single capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unopened,
    HeaderChecked,
    Parsing,
    RowsEmitted,
    Aggregated,
    Reported,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Unopened => "unopened",
            Stage::HeaderChecked => "header checked",
            Stage::Parsing => "parsing",
            Stage::RowsEmitted => "rows emitted",
            Stage::Aggregated => "aggregated",
            Stage::Reported => "reported",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Settings shared by every file of a run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub parse: ParseOptions,
    pub format: ReportFormat,
    pub results_dir: PathBuf,
    /// Show a progress bar while processing.
    pub show_progress: bool,
}

/// Tracks the stage of the file being processed.
struct FileRun<'a> {
    capture: &'a CaptureFile,
    stage: Stage,
}

impl<'a> FileRun<'a> {
    fn new(capture: &'a CaptureFile) -> Self {
        Self {
            capture,
            stage: Stage::Unopened,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug!("{}: {} -> {}", self.capture.name, self.stage, next);
        self.stage = next;
    }
}

/// Path of the CSV table for `file` inside `results_dir`.
pub fn csv_path(results_dir: &Path, file: &str) -> PathBuf {
    results_dir.join(format!("{}.csv", file))
}

/// Run one capture through every stage.
pub fn process_file(capture: &CaptureFile, options: &PipelineOptions) -> Result<FileOutcome> {
    let mut run = FileRun::new(capture);
    let path = &capture.path;

    let header_inserted = normalize_header(path, capture.category)
        .with_context(|| format!("Failed while {} for {}", run.stage, capture.name))?;
    run.advance(Stage::HeaderChecked);

    let content = fs::read_to_string(path).map_err(|e| CaptureError::read(path, e))?;
    run.advance(Stage::Parsing);
    let parsed = parse_capture(&content, capture.category, &options.parse);

    let csv_out = csv_path(&options.results_dir, &capture.name);
    let file = File::create(&csv_out).map_err(|e| CaptureError::write(&csv_out, e))?;
    write_csv(&parsed, BufWriter::new(file))
        .with_context(|| format!("Failed to write CSV {}", csv_out.display()))?;
    run.advance(Stage::RowsEmitted);

    let acc = ColumnAccumulator::from_capture(&parsed);
    run.advance(Stage::Aggregated);

    let report = build_file_report(&capture.name, parsed.category, parsed.rows.len(), &acc);
    let report_out = write_report(&report, &options.results_dir, options.format)?;
    run.advance(Stage::Reported);

    debug!(
        "{}: {} rows -> {}, {} columns -> {}",
        capture.name,
        parsed.rows.len(),
        csv_out.display(),
        report.columns.len(),
        report_out.display()
    );
    run.advance(Stage::Done);

    Ok(FileOutcome {
        file: capture.name.clone(),
        category: capture.category,
        header_inserted,
        rows: parsed.rows.len(),
        columns_reported: report.columns.len(),
    })
}

/// Process every capture in order, creating the results directory first.
pub fn run(files: &[CaptureFile], options: &PipelineOptions) -> Result<RunSummary> {
    fs::create_dir_all(&options.results_dir).with_context(|| {
        format!(
            "Failed to create results directory {}",
            options.results_dir.display()
        )
    })?;
    info!("Writing results to {}", options.results_dir.display());

    let progress = if options.show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut summary = RunSummary::default();

    for capture in files {
        progress.set_message(capture.name.clone());
        let outcome = process_file(capture, options)?;
        summary.record(outcome);
        progress.inc(1);
    }

    progress.finish_and_clear();

    Ok(summary)
}
