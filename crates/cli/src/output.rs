//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use dashboard_lib::aggregate::MigrationWave;
use dashboard_lib::forecast::YearProjection;
use dashboard_lib::ReportSummary;
use tabled::{settings::Style, Table, Tabled};

/// Output format for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
pub struct WaveRow {
    #[tabled(rename = "Wave")]
    pub wave: u8,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "VMs")]
    pub vms: usize,
    #[tabled(rename = "vCPUs")]
    pub vcpus: u64,
    #[tabled(rename = "Memory (GB)")]
    pub memory_gb: u64,
}

impl From<&MigrationWave> for WaveRow {
    fn from(wave: &MigrationWave) -> Self {
        Self {
            wave: wave.wave,
            name: wave.name.clone(),
            vms: wave.vm_count,
            vcpus: wave.vcpus,
            memory_gb: wave.memory_gb,
        }
    }
}

#[derive(Tabled)]
pub struct YearRow {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "VMs")]
    pub vms: u64,
    #[tabled(rename = "vCPUs")]
    pub vcpus: u64,
    #[tabled(rename = "Memory (GB)")]
    pub memory_gb: u64,
}

impl From<&YearProjection> for YearRow {
    fn from(year: &YearProjection) -> Self {
        Self {
            year: year.year,
            vms: year.vms,
            vcpus: year.vcpus,
            memory_gb: year.memory_gb,
        }
    }
}

/// Print the run summary in the chosen format
pub fn print_summary(summary: &ReportSummary, format: OutputFormat) {
    match format {
        OutputFormat::Table => print_summary_tables(summary),
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "output": summary.output.display().to_string(),
                "bytes_written": summary.bytes_written,
                "stats": &summary.snapshot.stats,
                "waves": &summary.snapshot.waves,
                "forecast": &summary.forecast,
            });
            match serde_json::to_string_pretty(&doc) {
                Ok(json) => println!("{}", json),
                Err(e) => print_error(&format!("Failed to serialize summary: {e}")),
            }
        }
    }
}

fn print_summary_tables(summary: &ReportSummary) {
    let stats = &summary.snapshot.stats;
    let metrics = vec![
        MetricRow {
            metric: "Total VMs",
            value: stats.total_vms.to_string(),
        },
        MetricRow {
            metric: "Running / Stopped",
            value: format!("{} / {}", stats.running_vms, stats.stopped_vms),
        },
        MetricRow {
            metric: "Clusters / Hosts",
            value: format!("{} / {}", stats.total_clusters, stats.total_hosts),
        },
        MetricRow {
            metric: "vCPUs",
            value: stats.total_vcpus.to_string(),
        },
        MetricRow {
            metric: "Memory (GB)",
            value: stats.total_memory_gb.to_string(),
        },
        MetricRow {
            metric: "Storage used / provisioned (GB)",
            value: format!(
                "{:.2} / {:.2} ({}%)",
                stats.total_storage_used_gb,
                stats.total_storage_provisioned_gb,
                stats.storage_efficiency
            ),
        },
    ];
    print_table(&metrics);

    let waves: Vec<WaveRow> = summary.snapshot.waves.iter().map(WaveRow::from).collect();
    println!();
    println!("{}", "Migration waves".bold());
    print_table(&waves);

    let forecast = &summary.forecast;
    let years: Vec<YearRow> = forecast.years.iter().map(YearRow::from).collect();
    println!();
    println!("{}", format!("Forecast: {}", forecast.scenario).bold());
    print_table(&years);
    println!(
        "Recommended nodes in {}: {} ({})",
        forecast.plan.year,
        forecast.plan.total_nodes.to_string().cyan(),
        forecast.plan.node_size.label()
    );
}

fn print_table<T: Tabled>(items: &[T]) {
    if items.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MiB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KiB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
