//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sysreport - turn monitor captures into CSV tables and statistics
///
/// Reads every capture file in INPUT_DIR (top process tables, iostat disk
/// tables, cpu and memory samples), writes one CSV per file plus a
/// max/min/avg report per file into INPUT_DIR_results.
///
/// Examples:
///   sysreport ./captures
///   sysreport ./captures --format json
///   sysreport ./captures --dry-run
///   sysreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing the capture files
    #[arg(value_name = "INPUT_DIR", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .sysreport.toml in the current directory,
    /// then in the input directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Report format (text, json)
    ///
    /// Defaults to text, or to the config file setting.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Results directory
    ///
    /// Defaults to a sibling of INPUT_DIR named INPUT_DIR_results
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Dry run: list capture files and their categories without touching them
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .sysreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Format of the per-file statistics report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text blocks (default)
    #[default]
    Text,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the input directory, empty if not set (should be validated first).
    pub fn input_dir(&self) -> PathBuf {
        self.input.clone().unwrap_or_default()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        let Some(ref input) = self.input else {
            return Err("An input directory is required".to_string());
        };

        if !input.exists() {
            return Err(format!("Input directory does not exist: {}", input.display()));
        }
        if !input.is_dir() {
            return Err(format!("Input path is not a directory: {}", input.display()));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
