//! VM Migration Dashboard CLI
//!
//! Reads a hypervisor VM inventory export and writes a self-contained,
//! interactive HTML migration planning dashboard.

mod config;
mod output;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use dashboard_lib::{default_output_path, generate_dashboard, ReportOptions};
use output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// VM Migration Dashboard generator
#[derive(Parser)]
#[command(name = "vmdash")]
#[command(author, version, about = "Generate an interactive VM migration planning dashboard from an inventory export", long_about = None)]
pub struct Cli {
    /// Inventory export (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv)
    pub input: PathBuf,

    /// Output HTML file (defaults to <input stem>_dashboard.html in the current directory)
    pub output: Option<PathBuf>,

    /// Growth scenario: conservative, typical, aggressive or a percentage
    #[arg(long, short)]
    pub growth: Option<String>,

    /// Worker node size used for infrastructure sizing: small, medium or large
    #[arg(long)]
    pub node_size: Option<String>,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, env = "VMDASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Summary output format
    #[arg(long, short, default_value = "table")]
    pub format: OutputFormat,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&format!("{err:?}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = config::Overrides {
        title: cli.title.clone(),
        growth_scenario: cli.growth.clone(),
        node_size: cli.node_size.clone(),
        log_json: cli.log_json,
    };
    let settings = config::Settings::load(cli.config.as_deref(), &overrides)?;
    init_tracing(settings.log_json, cli.verbose);

    let options = ReportOptions {
        title: settings.title.clone(),
        forecast: settings.forecast_options()?,
    };
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));
    let chatty = cli.format == OutputFormat::Table;

    if chatty {
        output::print_info(&format!("Reading inventory from {}", cli.input.display()));
    }

    let summary = generate_dashboard(
        &cli.input,
        &output_path,
        &options,
        Local::now().naive_local(),
    )
    .with_context(|| format!("Failed to generate dashboard from {}", cli.input.display()))?;

    if chatty {
        let cleaning = &summary.cleaning;
        if cleaning.dropped_missing_name > 0 {
            output::print_warning(&format!(
                "Skipped {} rows without a VM name",
                cleaning.dropped_missing_name
            ));
        }
        if cleaning.dropped_outliers > 0 {
            output::print_warning(&format!(
                "Skipped {} rows with implausible memory values",
                cleaning.dropped_outliers
            ));
        }
        if summary.snapshot.is_empty() {
            output::print_warning("No VM records found; the dashboard is empty");
        }
        output::print_success(&format!(
            "Dashboard written to {} ({})",
            summary.output.display(),
            output::format_bytes(summary.bytes_written)
        ));
        println!();
    }

    output::print_summary(&summary, cli.format);
    Ok(())
}

/// Logs go to stderr; stdout is reserved for the summary
fn init_tracing(json: bool, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
