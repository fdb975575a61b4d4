//! Migration dashboard library
//!
//! This crate turns a hypervisor VM inventory export into a self-contained
//! HTML planning dashboard:
//! - Tabular ingestion and header resolution
//! - Record cleaning and classification
//! - Aggregation into a read-only snapshot
//! - Capacity forecasting and node sizing
//! - Report rendering and atomic output

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod report;

pub use aggregate::{Snapshot, SummaryStats};
pub use error::{DashboardError, Result};
pub use forecast::{Forecast, ForecastOptions, GrowthScenario, NodeSize};
pub use models::*;
pub use observability::StructuredLogger;
pub use pipeline::{default_output_path, generate_dashboard, process_table, ReportSummary};
pub use report::{DashboardRenderer, ReportOptions, DEFAULT_TITLE};
