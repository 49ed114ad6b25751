//! Sysreport - monitor capture to CSV converter
//!
//! A CLI tool that takes the periodic capture files written by
//! `top`/`iostat`-style monitors, turns each one into a CSV table and
//! writes a max/min/avg report for every numeric column.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable capture, unwritable output, bad config)
//!   2 - Usage error (missing INPUT_DIR)

mod analysis;
mod capture;
mod cli;
mod config;
mod error;
mod models;
mod pipeline;
mod report;
mod scanner;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `verbose` can come from the file
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&args, &config);

    info!("Sysreport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run_conversion(&args, &config) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Conversion failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .sysreport.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(scanner::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  .sysreport.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .sysreport.toml")?;

    println!("✅ Created .sysreport.toml with default settings.");
    println!("   Edit it to customize excludes, banner prefix and report format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let mut level = args.log_level();
    if config.general.verbose && !args.quiet {
        level = tracing::Level::DEBUG;
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration: explicit path, then current directory, then input directory.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)?
    } else if let Some(config) = Config::load_default()? {
        config
    } else if let Some(config) = Config::load_from_dir(&args.input_dir())? {
        config
    } else {
        Config::default()
    };

    config.merge_with_args(args);
    Ok(config)
}

/// Run the conversion over the whole input directory.
fn run_conversion(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();
    let input_dir = args.input_dir();

    let scan_config = scanner::ScanConfig::from(&config.scanner);
    let file_scanner = scanner::CaptureScanner::new(input_dir.clone(), scan_config);
    let files = file_scanner
        .scan()
        .with_context(|| format!("Failed to scan {}", input_dir.display()))?;

    // Handle --dry-run: list files and exit
    if args.dry_run {
        return handle_dry_run(&files);
    }

    let results_dir = match args.output_dir {
        Some(ref dir) => dir.clone(),
        None => scanner::results_dir(&input_dir, &config.output.results_suffix)?,
    };

    if !args.quiet {
        println!("📂 Processing {} capture files from {}", files.len(), input_dir.display());
    }

    let options = pipeline::PipelineOptions {
        parse: capture::ParseOptions::from(&config.parser),
        format: config.output.format,
        results_dir: results_dir.clone(),
        show_progress: !args.quiet,
    };

    let summary = pipeline::run(&files, &options)?;

    if !args.quiet {
        println!("\n📊 Conversion Summary:");
        println!("   Files processed: {}", summary.files_processed);
        println!("   Headers inserted: {}", summary.headers_inserted);
        println!("   Rows written: {}", summary.rows_emitted);
        println!("   Columns reported: {}", summary.columns_reported);
        for outcome in &summary.files {
            println!(
                "     📄 {} [{}] {} rows, {} columns",
                outcome.file, outcome.category, outcome.rows, outcome.columns_reported
            );
        }
        println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
        println!("\n✅ Done! Results saved to: {}", results_dir.display());
    }

    Ok(())
}

/// Handle --dry-run: print what would be processed, exit.
fn handle_dry_run(files: &[models::CaptureFile]) -> Result<()> {
    println!("\n🔍 Dry run: scanning capture files (nothing is modified)...\n");

    if files.is_empty() {
        println!("   No capture files found.");
    } else {
        println!("   Found {} files that would be processed:\n", files.len());
        for file in files {
            let header_note = if file.category.header_template().is_some() {
                " (header checked)"
            } else {
                ""
            };
            println!("     📄 {} [{}]{}", file.name, file.category, header_note);
        }
    }

    println!("\n✅ Dry run complete. No files were written.");
    Ok(())
}
