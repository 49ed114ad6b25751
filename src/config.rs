//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.sysreport.toml` files.

use crate::cli::ReportFormat;
use crate::scanner::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Scanner settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Parser settings.
    #[serde(default)]
    pub parser: ParserConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Capture scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// File names to skip.
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Process dot-files as captures.
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum files to process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<usize>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            excludes: Vec::new(),
            include_hidden: true,
            max_files: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Snapshot parser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Prefix marking kernel banner lines.
    #[serde(default = "default_banner_prefix")]
    pub banner_prefix: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            banner_prefix: default_banner_prefix(),
        }
    }
}

fn default_banner_prefix() -> String {
    "Linux".to_string()
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Suffix appended to the input directory name.
    #[serde(default = "default_results_suffix")]
    pub results_suffix: String,

    /// Report format.
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_suffix: default_results_suffix(),
            format: ReportFormat::default(),
        }
    }
}

fn default_results_suffix() -> String {
    "_results".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the current directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory (e.g. the capture directory).
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(format) = args.format {
            self.output.format = format;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
