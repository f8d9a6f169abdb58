//! KPAT command line utilities.
//!
//! Batch operations on annotation folders; interactive editing goes through
//! the library's `AnnotationSession`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use kpat::config::AppConfig;
use kpat::format::{AnnotationFormat, convert_directory};
use kpat::state::ImageSequence;

#[derive(Parser)]
#[command(name = "kpat")]
#[command(about = "KPAT - 68-point facial landmark annotation tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every TXT annotation in a folder to JSON
    Convert {
        /// Folder holding images and their .txt annotations
        dir: PathBuf,
    },

    /// Show how many landmarks each image has
    Status {
        /// Image folder
        dir: PathBuf,

        /// Annotation format to inspect (txt or json)
        #[arg(short, long)]
        format: Option<AnnotationFormat>,
    },

    /// Write the effective configuration to the config file
    InitConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load_from_default_path(),
    };
    // Reported on stderr: the logger is configured from this file
    let config = match loaded {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Warning: ignoring configuration file: {}", e);
            AppConfig::default()
        }
    };

    // RUST_LOG takes precedence over the configured level
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        config.preferences.log_level.to_level_filter()
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Convert { dir } => cmd_convert(&dir),
        Commands::Status { dir, format } => {
            cmd_status(&dir, format.unwrap_or(config.preferences.annotation_format))
        }
        Commands::InitConfig => cmd_init_config(&config, cli.config),
    }
}

fn cmd_init_config(config: &AppConfig, path: Option<PathBuf>) -> ExitCode {
    let Some(path) = path.or_else(AppConfig::default_path) else {
        eprintln!("Error: could not determine the config directory");
        return ExitCode::FAILURE;
    };

    match config.save_to(&path) {
        Ok(()) => {
            println!("Wrote configuration to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: cannot write {}: {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_convert(dir: &Path) -> ExitCode {
    let report = match convert_directory(dir) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if report.outcomes.is_empty() {
        println!("No .txt annotation files found in {}", dir.display());
        return ExitCode::SUCCESS;
    }

    for outcome in &report.outcomes {
        let name = file_name(&outcome.source);
        match &outcome.result {
            Ok(written) => println!("✓ {} -> {}", name, file_name(written)),
            Err(e) => println!("✗ {}: {}", name, e),
        }
    }

    println!();
    println!(
        "Converted {} of {} files ({} failed)",
        report.succeeded(),
        report.outcomes.len(),
        report.failed()
    );

    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_status(dir: &Path, format: AnnotationFormat) -> ExitCode {
    let sequence = match ImageSequence::from_folder(dir) {
        Ok(sequence) => sequence,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let codec = format.codec();
    let mut complete = 0;
    for image in sequence.images() {
        let status = match codec.read(image) {
            Ok(Some(store)) => {
                if store.len() == kpat::constants::KEYPOINT_COUNT {
                    complete += 1;
                }
                format!("{}/{}", store.len(), kpat::constants::KEYPOINT_COUNT)
            }
            Ok(None) => "no annotation file".to_string(),
            Err(e) => format!("error: {}", e),
        };
        println!("{:<40} {}", file_name(image), status);
    }

    println!();
    println!(
        "{} images, {} fully annotated ({})",
        sequence.len(),
        complete,
        format
    );
    ExitCode::SUCCESS
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
