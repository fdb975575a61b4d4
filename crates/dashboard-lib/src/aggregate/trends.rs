//! Month-bucketed growth series

use crate::models::ClassifiedVm;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resources created in one calendar month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthBucket {
    pub vms: usize,
    pub vcpus: u64,
    pub memory_gb: u64,
}

/// Parallel arrays indexed by `months` ("YYYY-MM"), oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthTrends {
    pub months: Vec<String>,
    pub monthly_vms: Vec<usize>,
    pub monthly_vcpus: Vec<u64>,
    pub monthly_memory_gb: Vec<u64>,
    pub cumulative_vms: Vec<usize>,
    pub cumulative_vcpus: Vec<u64>,
    pub cumulative_memory_gb: Vec<u64>,
}

/// Bucket dated VMs by (year, month); undated VMs are skipped
pub fn monthly_buckets(vms: &[ClassifiedVm]) -> BTreeMap<(i32, u32), MonthBucket> {
    vms.iter()
        .filter_map(|vm| vm.record.creation_date.map(|d| (vm, (d.year(), d.month()))))
        .fold(BTreeMap::new(), |mut buckets, (vm, key)| {
            let bucket: &mut MonthBucket = buckets.entry(key).or_default();
            bucket.vms += 1;
            bucket.vcpus += u64::from(vm.record.vcpus);
            bucket.memory_gb += vm.record.memory_gb;
            buckets
        })
}

pub fn month_label((year, month): (i32, u32)) -> String {
    format!("{year:04}-{month:02}")
}

/// Monthly and running totals, `None` when no VM carries a creation date
pub fn growth_trends(vms: &[ClassifiedVm]) -> Option<GrowthTrends> {
    let buckets = monthly_buckets(vms);
    if buckets.is_empty() {
        return None;
    }

    let mut trends = GrowthTrends {
        months: Vec::with_capacity(buckets.len()),
        monthly_vms: Vec::with_capacity(buckets.len()),
        monthly_vcpus: Vec::with_capacity(buckets.len()),
        monthly_memory_gb: Vec::with_capacity(buckets.len()),
        cumulative_vms: Vec::with_capacity(buckets.len()),
        cumulative_vcpus: Vec::with_capacity(buckets.len()),
        cumulative_memory_gb: Vec::with_capacity(buckets.len()),
    };

    let mut running = MonthBucket::default();
    for (key, bucket) in buckets {
        running.vms += bucket.vms;
        running.vcpus += bucket.vcpus;
        running.memory_gb += bucket.memory_gb;

        trends.months.push(month_label(key));
        trends.monthly_vms.push(bucket.vms);
        trends.monthly_vcpus.push(bucket.vcpus);
        trends.monthly_memory_gb.push(bucket.memory_gb);
        trends.cumulative_vms.push(running.vms);
        trends.cumulative_vcpus.push(running.vcpus);
        trends.cumulative_memory_gb.push(running.memory_gb);
    }

    Some(trends)
}
