//! Aggregation of classified VMs into a read-only snapshot
//!
//! Every function here is a pure reduction over `&[ClassifiedVm]`; the
//! snapshot is assembled once and never mutated afterwards.

mod distributions;
mod stats;
mod trends;
mod waves;


pub use distributions::{
    cluster_rollups, complexity_by_os, count_by, distributions, host_rollups, size_details,
    ClusterRollup, ComplexityCounts, DistributionEntry, Distributions, HostRollup, SizeDetail,
};
pub use stats::{summary_stats, SummaryStats};
pub use trends::{growth_trends, month_label, monthly_buckets, GrowthTrends, MonthBucket};
pub use waves::{migration_waves, MigrationWave};

use crate::models::{ClassifiedVm, InventoryRow};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp format used for `generated_at`
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The full processed dataset handed to forecasting and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generated_at: String,
    pub stats: SummaryStats,
    pub distributions: Distributions,
    pub by_cluster: BTreeMap<String, ClusterRollup>,
    pub by_host: BTreeMap<String, HostRollup>,
    pub size_details: Vec<SizeDetail>,
    pub waves: Vec<MigrationWave>,
    pub complexity_by_os: BTreeMap<String, ComplexityCounts>,
    pub growth_trends: Option<GrowthTrends>,
    pub clusters: Vec<String>,
    pub hosts: Vec<String>,
    pub os_labels: Vec<String>,
    pub vm_list: Vec<InventoryRow>,
}

impl Snapshot {
    /// Assemble every aggregate from the classified records
    pub fn build(vms: &[ClassifiedVm], generated_at: NaiveDateTime) -> Self {
        let by_cluster = cluster_rollups(vms);
        let by_host = host_rollups(vms);
        let complexity_by_os = complexity_by_os(vms);

        Self {
            generated_at: generated_at.format(GENERATED_AT_FORMAT).to_string(),
            stats: summary_stats(vms),
            distributions: distributions(vms),
            size_details: size_details(vms),
            waves: migration_waves(vms),
            growth_trends: growth_trends(vms),
            clusters: by_cluster.keys().cloned().collect(),
            hosts: by_host.keys().cloned().collect(),
            os_labels: complexity_by_os.keys().cloned().collect(),
            vm_list: vms.iter().map(InventoryRow::from).collect(),
            by_cluster,
            by_host,
            complexity_by_os,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stats.total_vms == 0
    }
}
