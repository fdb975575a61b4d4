//! Global summary statistics

use super::trends::{month_label, monthly_buckets};
use crate::classify::storage_efficiency;
use crate::models::{round_to, ClassifiedVm, PowerStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_vms: usize,
    pub total_vcpus: u64,
    pub total_memory_gb: u64,
    pub total_storage_provisioned_gb: f64,
    pub total_storage_used_gb: f64,
    pub running_vms: usize,
    pub stopped_vms: usize,
    pub total_clusters: usize,
    pub total_hosts: usize,
    /// Earliest creation date (YYYY-MM-DD)
    pub first_created: Option<String>,
    pub last_created: Option<String>,
    /// Mean VMs created per month, over months with at least one creation
    pub avg_vms_per_month: f64,
    pub peak_month: Option<String>,
    pub peak_month_vms: usize,
    pub storage_efficiency: f64,
}

pub fn summary_stats(vms: &[ClassifiedVm]) -> SummaryStats {
    let mut stats = vms.iter().fold(SummaryStats::default(), |mut acc, vm| {
        let r = &vm.record;
        acc.total_vms += 1;
        acc.total_vcpus += u64::from(r.vcpus);
        acc.total_memory_gb += r.memory_gb;
        acc.total_storage_provisioned_gb += r.storage_provisioned_gb;
        acc.total_storage_used_gb += r.storage_used_gb;
        match r.status {
            PowerStatus::On => acc.running_vms += 1,
            PowerStatus::Off => acc.stopped_vms += 1,
            PowerStatus::Unknown => {}
        }
        acc
    });

    stats.storage_efficiency = storage_efficiency(
        stats.total_storage_used_gb,
        stats.total_storage_provisioned_gb,
    );
    stats.total_storage_provisioned_gb = round_to(stats.total_storage_provisioned_gb, 2);
    stats.total_storage_used_gb = round_to(stats.total_storage_used_gb, 2);

    stats.total_clusters = vms
        .iter()
        .map(|vm| vm.record.cluster.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    stats.total_hosts = vms
        .iter()
        .map(|vm| vm.record.host.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let dates = vms.iter().filter_map(|vm| vm.record.creation_date);
    stats.first_created = dates.clone().min().map(|d| d.format("%Y-%m-%d").to_string());
    stats.last_created = dates.max().map(|d| d.format("%Y-%m-%d").to_string());

    let buckets = monthly_buckets(vms);
    if !buckets.is_empty() {
        let dated: usize = buckets.values().map(|b| b.vms).sum();
        stats.avg_vms_per_month = round_to(dated as f64 / buckets.len() as f64, 1);

        // first month wins on ties
        let mut peak: Option<((i32, u32), usize)> = None;
        for (key, bucket) in &buckets {
            if peak.map_or(true, |(_, best)| bucket.vms > best) {
                peak = Some((*key, bucket.vms));
            }
        }
        if let Some((key, count)) = peak {
            stats.peak_month = Some(month_label(key));
            stats.peak_month_vms = count;
        }
    }

    stats
}
