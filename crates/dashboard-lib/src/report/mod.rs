//! HTML report rendering
//!
//! The page is a single tera template. Styles and the browser script are
//! plain assets spliced in verbatim, and all data the script needs travels
//! in one JSON block.

mod charts;
mod writer;

pub use charts::{
    forecast_base, migration_charts, overview_charts, sizing_charts, trend_charts, ChartData,
    ClusterShare, ComplexitySeries, CountSeries, ForecastBase, MigrationCharts, OverviewCharts,
    ResourceSeries, SizingCharts, TrendCharts,
};
pub use writer::write_atomically;

use crate::aggregate::Snapshot;
use crate::error::Result;
use crate::forecast::{Forecast, ForecastConstants, ForecastOptions};
use crate::models::InventoryRow;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

pub const DEFAULT_TITLE: &str = "RHV to OpenShift Virtualization Migration Dashboard";

/// Element id of the embedded JSON block
pub const DATA_ELEMENT_ID: &str = "dashboard-data";

const PAGE_TEMPLATE: &str = "dashboard.html";
const PAGE_SOURCE: &str = include_str!("../../templates/dashboard.html.tera");
const STYLES: &str = include_str!("../../templates/dashboard.css");
const SCRIPT: &str = include_str!("../../templates/dashboard.js");

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    pub title: &'static str,
    pub description: &'static str,
}

/// Pre-migration tasks shown on the migration tab
pub const CHECKLIST: [ChecklistItem; 10] = [
    ChecklistItem {
        title: "Install MTV Operator",
        description: "Deploy Migration Toolkit for Virtualization operator on OpenShift cluster",
    },
    ChecklistItem {
        title: "Configure RHV Provider",
        description: "Add RHV as source provider with valid credentials and CA certificate",
    },
    ChecklistItem {
        title: "Set Up Storage Classes",
        description: "Create storage classes mapped to RHV storage domains (ODF, NFS, etc.)",
    },
    ChecklistItem {
        title: "Install VirtIO Drivers (Windows)",
        description: "Ensure Windows VMs have latest VirtIO drivers installed before migration",
    },
    ChecklistItem {
        title: "Configure Network Mappings",
        description: "Map RHV networks to OpenShift networks (OVN-Kubernetes, bridge, SR-IOV)",
    },
    ChecklistItem {
        title: "Verify Resource Capacity",
        description: "Ensure OpenShift cluster has sufficient CPU, memory, and storage capacity",
    },
    ChecklistItem {
        title: "Plan Maintenance Windows",
        description: "Schedule migration waves during maintenance windows to minimize impact",
    },
    ChecklistItem {
        title: "Backup VMs",
        description: "Create backups or snapshots of VMs before migration",
    },
    ChecklistItem {
        title: "Test Migration (Pilot)",
        description: "Perform pilot migration with non-critical VMs to validate process",
    },
    ChecklistItem {
        title: "Document Rollback Plan",
        description: "Prepare rollback procedures in case of migration issues",
    },
];

/// Presentation settings for one report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    pub forecast: ForecastOptions,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            forecast: ForecastOptions::default(),
        }
    }
}

/// Everything the browser script reads at load time
#[derive(Debug, Serialize)]
struct EmbeddedData<'a> {
    generated_at: &'a str,
    vm_list: &'a [InventoryRow],
    charts: ChartData,
    constants: ForecastConstants,
}

pub struct DashboardRenderer {
    tera: Tera,
}

impl DashboardRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.register_filter("thousands", thousands_filter);
        tera.add_raw_template(PAGE_TEMPLATE, PAGE_SOURCE)?;
        Ok(Self { tera })
    }

    /// Render the complete self-contained page
    pub fn render(
        &self,
        snapshot: &Snapshot,
        forecast: &Forecast,
        options: &ReportOptions,
    ) -> Result<String> {
        let constants = ForecastConstants::new(options.forecast, forecast.base_year);
        let data = EmbeddedData {
            generated_at: &snapshot.generated_at,
            vm_list: &snapshot.vm_list,
            charts: ChartData::build(snapshot, forecast),
            constants: constants.clone(),
        };

        let mut ctx = Context::new();
        ctx.insert("title", &options.title);
        ctx.insert("snapshot", snapshot);
        ctx.insert("stats", &snapshot.stats);
        ctx.insert("forecast", forecast);
        ctx.insert("constants", &constants);
        ctx.insert("node_label", &options.forecast.node_size.label());
        ctx.insert("checklist", &CHECKLIST);
        ctx.insert("data_element_id", DATA_ELEMENT_ID);
        ctx.insert("data_json", &embed_json(&data)?);
        ctx.insert("styles", STYLES);
        ctx.insert("script", SCRIPT);

        Ok(self.tera.render(PAGE_TEMPLATE, &ctx)?)
    }
}

/// Serialize for a `<script type="application/json">` block
///
/// Every `<` is written as `\u003c` so no string in the data can close the tag.
pub fn embed_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace('<', "\\u003c"))
}

/// Group the integer part in thousands: 1234567.8 → "1,234,568" (0 decimals)
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }

    let is_zero = out.chars().all(|c| matches!(c, '0' | ',' | '.'));
    if value < 0.0 && !is_zero {
        out.insert(0, '-');
    }
    out
}

fn thousands_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let number = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg(format!("thousands expects a number, got {value}")))?;
    let decimals = args.get("decimals").and_then(Value::as_u64).unwrap_or(0) as usize;
    Ok(Value::String(format_thousands(number, decimals)))
}
