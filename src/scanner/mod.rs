//! Capture directory scanning.
//!
//! This module lists the capture files of an input directory, resolves
//! each file's category and names the sibling results directory.

use crate::error::CaptureError;
use crate::models::{CaptureFile, Category};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Name of the optional per-directory configuration file.
pub const CONFIG_FILE_NAME: &str = ".sysreport.toml";

/// Configuration for capture scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Exact file names to skip
    pub excludes: Vec<String>,
    /// Whether dot-files are processed
    pub include_hidden: bool,
    /// Maximum number of files to process
    pub max_files: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            excludes: vec![CONFIG_FILE_NAME.to_string()],
            include_hidden: true,
            max_files: None,
        }
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        let mut excludes = config.excludes.clone();
        if !excludes.iter().any(|e| e == CONFIG_FILE_NAME) {
            excludes.push(CONFIG_FILE_NAME.to_string());
        }

        Self {
            excludes,
            include_hidden: config.include_hidden,
            max_files: config.max_files,
        }
    }
}

/// Scanner for the capture files of one directory.
pub struct CaptureScanner {
    config: ScanConfig,
    input_dir: PathBuf,
}

impl CaptureScanner {
    /// Create a new capture scanner.
    pub fn new(input_dir: PathBuf, config: ScanConfig) -> Self {
        Self { config, input_dir }
    }

    /// List capture files directly inside the input directory, by name.
    ///
    /// Sub-directories are not descended into.
    pub fn scan(&self) -> Result<Vec<CaptureFile>> {
        if !self.input_dir.is_dir() {
            return Err(CaptureError::InputNotDirectory(self.input_dir.clone()).into());
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(&self.input_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            if !entry.file_type().is_file() {
                debug!("Skipping non-file entry: {}", entry.path().display());
                continue;
            }

            if self.is_excluded(&name) {
                debug!("Skipping excluded file: {}", name);
                continue;
            }

            if let Some(max) = self.config.max_files {
                if files.len() >= max {
                    debug!("Reached max_files limit ({})", max);
                    break;
                }
            }

            files.push(CaptureFile {
                path: entry.path().to_path_buf(),
                category: Category::from_file_name(&name),
                name,
            });
        }

        Ok(files)
    }

    /// Check if a name matches exclusion rules.
    fn is_excluded(&self, name: &str) -> bool {
        if !self.config.include_hidden && name.starts_with('.') {
            return true;
        }

        self.config.excludes.iter().any(|pattern| name == pattern)
    }
}

/// Sibling directory receiving the results for `input_dir`.
///
/// `captures/` maps to `captures_results` next to it. Trailing separators
/// and `.` are resolved before naming.
pub fn results_dir(input_dir: &Path, suffix: &str) -> Result<PathBuf> {
    let resolved = match input_dir.file_name() {
        Some(_) => input_dir.to_path_buf(),
        None => fs::canonicalize(input_dir)
            .map_err(|e| CaptureError::read(input_dir, e))?,
    };

    let name = resolved
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Cannot name results directory for {}", input_dir.display()))?;

    let mut dir_name = name.to_os_string();
    dir_name.push(suffix);

    Ok(match resolved.parent() {
        Some(parent) => parent.join(dir_name),
        None => PathBuf::from(dir_name),
    })
}
