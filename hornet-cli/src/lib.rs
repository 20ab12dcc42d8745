#![warn(missing_docs)]
//! Hornet CLI Library
//!
//! This module provides the CLI infrastructure for suite binaries.
//! Use `hornet::run(launcher)` (or `hornet_cli::run(launcher)`) in your main
//! function with the launcher that opens your benchmark pages.
//!
//! # Example
//!
//! ```ignore
//! use hornet::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let launcher = InProcessLauncher::new()
//!         .with_page("benchmarks/addrow.html", add_row_page);
//!     hornet::run(launcher)
//! }
//! ```

mod config;
mod definitions;
mod formatting;
mod progress;

pub use config::*;
pub use definitions::SuiteFile;
pub use formatting::{format_benchmark_list, format_human_output, format_selection, format_tags};
pub use progress::ProgressObserver;

use clap::{Parser, Subcommand};
use hornet_runner::{ContextLauncher, Orchestrator, RunReport, generate_json_report};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Hornet CLI arguments
#[derive(Parser, Debug)]
#[command(name = "hornet")]
#[command(author, version, about = "Hornet - weighted benchmark suite runner")]
pub struct Cli {
    /// Subcommand; defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (discovered from the current directory if omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Benchmark definitions file (overrides [definitions].path)
    #[arg(long)]
    pub definitions: Option<PathBuf>,

    /// Output format: human, json
    #[arg(long)]
    pub format: Option<String>,

    /// Write the JSON run report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter hornet.toml into the current directory
    Init {
        /// Overwrite an existing hornet.toml
        #[arg(long)]
        force: bool,
    },
    /// List benchmarks and tags
    List,
    /// Decode a selection fragment and show what it enables
    Select {
        /// Fragment such as "et=dom" or "d=addrow"
        fragment: String,
    },
    /// Run the selected benchmarks (default)
    Run {
        /// Selection fragment; the core suite if omitted
        #[arg(long)]
        select: Option<String>,
    },
}

/// Run the Hornet CLI with the given launcher.
/// This is the main entry point for suite binaries.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run(launcher: impl ContextLauncher + 'static) -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli, launcher)
}

/// Run the Hornet CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli, launcher: impl ContextLauncher + 'static) -> anyhow::Result<()> {
    // Initialize logging
    let filter = if cli.verbose { "hornet=debug" } else { "hornet=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Some(Commands::Init { force }) = cli.command {
        let dir = std::env::current_dir()?;
        let path = HornetConfig::write_default(&dir, force)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    // Explicit --config wins, then hornet.toml discovery, then defaults
    let config = match &cli.config {
        Some(path) => HornetConfig::load(path)?,
        None => HornetConfig::discover().unwrap_or_default(),
    };

    let format: OutputFormat = match &cli.format {
        Some(format) => format.parse()?,
        None => config.output.format,
    };

    let definitions = cli
        .definitions
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.definitions.path));
    let suite = SuiteFile::load(&definitions)?;

    match cli.command {
        Some(Commands::Init { .. }) => Ok(()),
        Some(Commands::List) => list_benchmarks(suite),
        Some(Commands::Select { ref fragment }) => show_selection(suite, fragment),
        Some(Commands::Run { ref select }) => {
            run_suite(&cli, &config, format, suite, select.as_deref(), launcher)
        }
        None => run_suite(&cli, &config, format, suite, None, launcher),
    }
}

fn list_benchmarks(suite: SuiteFile) -> anyhow::Result<()> {
    let version = suite.version.clone();
    let (registry, tags) = suite.build()?;
    print!("{}", format_benchmark_list(&version, &registry, &tags));
    Ok(())
}

fn show_selection(suite: SuiteFile, fragment: &str) -> anyhow::Result<()> {
    let (mut registry, tags) = suite.build()?;
    hornet_selection::decode(fragment, &mut registry, &tags);
    let canonical = hornet_selection::encode(&registry, &tags);
    print!("{}", format_selection(&registry, &canonical));
    print!("{}", format_tags(&registry, &tags));
    Ok(())
}

fn run_suite(
    cli: &Cli,
    config: &HornetConfig,
    format: OutputFormat,
    suite: SuiteFile,
    fragment: Option<&str>,
    launcher: impl ContextLauncher + 'static,
) -> anyhow::Result<()> {
    let (registry, tags) = suite.build()?;
    let total = registry.len();

    let observer = match format {
        OutputFormat::Human => ProgressObserver::new(total),
        OutputFormat::Json => ProgressObserver::hidden(total),
    };

    let mut orchestrator = Orchestrator::new(registry, tags, launcher)
        .with_config(config.orchestrator_config()?)
        .with_suite_config(config.suite_config()?)
        .with_observer(observer);
    orchestrator.select(fragment.unwrap_or(""))?;

    if format == OutputFormat::Human {
        println!(
            "Running {} of {} benchmarks (#{}). For best results, close all other programs while the test is running.\n",
            orchestrator.registry().enabled_count(),
            total,
            orchestrator.selection()
        );
    }

    let outcome = orchestrator.run_to_completion()?;
    let report = RunReport::build(&orchestrator);

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Human => format_human_output(&report),
    };
    print!("{}", output);

    // Report file: CLI flag wins, then [output].report_path
    let report_path = cli
        .output
        .clone()
        .or_else(|| config.output.report_path.as_ref().map(PathBuf::from));
    if let Some(path) = report_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(&path)?;
        file.write_all(generate_json_report(&report)?.as_bytes())?;
        info!("Report written to: {}", path.display());
    }

    if !outcome.is_final() {
        info!("No final index: {}", outcome);
    }
    Ok(())
}
