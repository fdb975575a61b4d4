//! Chart datasets embedded in the report
//!
//! Every chart is an object of parallel arrays keyed by `labels`, so the
//! browser script can hand them to the chart library without reshaping.

use crate::aggregate::{DistributionEntry, Snapshot};
use crate::forecast::{CurrentTotals, Forecast};
use crate::models::{Complexity, SizeCategory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl CountSeries {
    fn from_entries(entries: &[DistributionEntry]) -> Self {
        Self {
            labels: entries.iter().map(|e| e.label.clone()).collect(),
            values: entries.iter().map(|e| e.count as u64).collect(),
        }
    }

    /// Counts in a fixed label order, zero where a label is absent
    fn in_order(entries: &[DistributionEntry], order: &[&str]) -> Self {
        Self {
            labels: order.iter().map(|l| l.to_string()).collect(),
            values: order
                .iter()
                .map(|label| {
                    entries
                        .iter()
                        .find(|e| e.label == *label)
                        .map_or(0, |e| e.count as u64)
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSeries {
    pub labels: Vec<String>,
    #[serde(default)]
    pub vms: Vec<u64>,
    pub vcpus: Vec<u64>,
    pub memory: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexitySeries {
    pub labels: Vec<String>,
    pub low: Vec<u64>,
    pub medium: Vec<u64>,
    pub high: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewCharts {
    pub os_family: CountSeries,
    pub size_category: CountSeries,
    pub complexity: CountSeries,
    pub cluster: ResourceSeries,
    pub host: ResourceSeries,
    pub guest_os: CountSeries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingCharts {
    pub size_pie: CountSeries,
    pub resources_by_size: ResourceSeries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationCharts {
    pub complexity_os: ComplexitySeries,
    pub waves: ResourceSeries,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendCharts {
    pub vm_growth: CountSeries,
    pub resource_growth: ResourceSeries,
    pub vms_per_month: CountSeries,
    pub resources_per_month: ResourceSeries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterShare {
    pub name: String,
    pub vms: u64,
    pub vcpus: u64,
    pub memory: u64,
}

/// Inputs the browser needs to recompute the forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastBase {
    pub current: CurrentTotals,
    pub clusters: Vec<ClusterShare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub overview: OverviewCharts,
    pub sizing: SizingCharts,
    pub migration: MigrationCharts,
    pub trends: TrendCharts,
    pub forecast: ForecastBase,
}

impl ChartData {
    pub fn build(snapshot: &Snapshot, forecast: &Forecast) -> Self {
        Self {
            overview: overview_charts(snapshot),
            sizing: sizing_charts(snapshot),
            migration: migration_charts(snapshot),
            trends: trend_charts(snapshot),
            forecast: forecast_base(snapshot, forecast),
        }
    }
}

pub fn overview_charts(snapshot: &Snapshot) -> OverviewCharts {
    let dist = &snapshot.distributions;
    let size_order: Vec<&str> = SizeCategory::ALL.iter().map(|s| s.as_str()).collect();
    let complexity_order: Vec<&str> = Complexity::ALL.iter().map(|c| c.as_str()).collect();

    OverviewCharts {
        os_family: CountSeries::from_entries(&dist.os_family),
        size_category: CountSeries::in_order(&dist.size_category, &size_order),
        complexity: CountSeries::in_order(&dist.complexity, &complexity_order),
        cluster: ResourceSeries {
            labels: snapshot.by_cluster.keys().cloned().collect(),
            vms: snapshot.by_cluster.values().map(|c| c.vm_count as u64).collect(),
            vcpus: snapshot.by_cluster.values().map(|c| c.vcpus).collect(),
            memory: snapshot.by_cluster.values().map(|c| c.memory_gb).collect(),
        },
        host: ResourceSeries {
            labels: snapshot.by_host.keys().cloned().collect(),
            vms: snapshot.by_host.values().map(|h| h.vm_count as u64).collect(),
            vcpus: snapshot.by_host.values().map(|h| h.vcpus).collect(),
            memory: snapshot.by_host.values().map(|h| h.memory_gb).collect(),
        },
        guest_os: CountSeries::from_entries(&dist.os_consolidated),
    }
}

pub fn sizing_charts(snapshot: &Snapshot) -> SizingCharts {
    let details = &snapshot.size_details;
    let labels: Vec<String> = details.iter().map(|d| d.category.to_string()).collect();

    SizingCharts {
        size_pie: CountSeries {
            labels: labels.clone(),
            values: details.iter().map(|d| d.vm_count as u64).collect(),
        },
        resources_by_size: ResourceSeries {
            labels,
            vms: Vec::new(),
            vcpus: details.iter().map(|d| d.vcpus).collect(),
            memory: details.iter().map(|d| d.memory_gb).collect(),
        },
    }
}

pub fn migration_charts(snapshot: &Snapshot) -> MigrationCharts {
    let table = &snapshot.complexity_by_os;
    let column = |level: Complexity| -> Vec<u64> {
        table.values().map(|counts| counts.get(level) as u64).collect()
    };

    MigrationCharts {
        complexity_os: ComplexitySeries {
            labels: table.keys().cloned().collect(),
            low: column(Complexity::Low),
            medium: column(Complexity::Medium),
            high: column(Complexity::High),
        },
        waves: ResourceSeries {
            labels: snapshot
                .waves
                .iter()
                .map(|w| format!("Wave {}", w.wave))
                .collect(),
            vms: snapshot.waves.iter().map(|w| w.vm_count as u64).collect(),
            vcpus: snapshot.waves.iter().map(|w| w.vcpus).collect(),
            memory: snapshot.waves.iter().map(|w| w.memory_gb).collect(),
        },
    }
}

/// Trend charts, all empty when no VM has a creation date
pub fn trend_charts(snapshot: &Snapshot) -> TrendCharts {
    let Some(trends) = &snapshot.growth_trends else {
        return TrendCharts::default();
    };
    let months = trends.months.clone();

    TrendCharts {
        vm_growth: CountSeries {
            labels: months.clone(),
            values: trends.cumulative_vms.iter().map(|&v| v as u64).collect(),
        },
        resource_growth: ResourceSeries {
            labels: months.clone(),
            vms: Vec::new(),
            vcpus: trends.cumulative_vcpus.clone(),
            memory: trends.cumulative_memory_gb.clone(),
        },
        vms_per_month: CountSeries {
            labels: months.clone(),
            values: trends.monthly_vms.iter().map(|&v| v as u64).collect(),
        },
        resources_per_month: ResourceSeries {
            labels: months,
            vms: Vec::new(),
            vcpus: trends.monthly_vcpus.clone(),
            memory: trends.monthly_memory_gb.clone(),
        },
    }
}

pub fn forecast_base(snapshot: &Snapshot, forecast: &Forecast) -> ForecastBase {
    ForecastBase {
        current: forecast.current,
        clusters: snapshot
            .by_cluster
            .iter()
            .map(|(name, rollup)| ClusterShare {
                name: name.clone(),
                vms: rollup.vm_count as u64,
                vcpus: rollup.vcpus,
                memory: rollup.memory_gb,
            })
            .collect(),
    }
}
