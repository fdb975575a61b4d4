//! Grouped counts and resource rollups

use crate::models::{round_to, ClassifiedVm, Complexity, SizeCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
}

/// Label → count tables, each ordered by count (descending) then label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distributions {
    pub os_family: Vec<DistributionEntry>,
    pub os_consolidated: Vec<DistributionEntry>,
    pub size_category: Vec<DistributionEntry>,
    pub complexity: Vec<DistributionEntry>,
    pub status: Vec<DistributionEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterRollup {
    pub vm_count: usize,
    pub vcpus: u64,
    pub memory_gb: u64,
    pub storage_provisioned_gb: f64,
    pub storage_used_gb: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRollup {
    pub vm_count: usize,
    pub vcpus: u64,
    pub memory_gb: u64,
}

/// One row of the sizing table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeDetail {
    pub category: SizeCategory,
    pub cpu_range: String,
    pub mem_range: String,
    pub vm_count: usize,
    pub vcpus: u64,
    pub memory_gb: u64,
    pub storage_gb: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityCounts {
    #[serde(rename = "Low")]
    pub low: usize,
    #[serde(rename = "Medium")]
    pub medium: usize,
    #[serde(rename = "High")]
    pub high: usize,
}

impl ComplexityCounts {
    pub fn add(&mut self, complexity: Complexity) {
        match complexity {
            Complexity::Low => self.low += 1,
            Complexity::Medium => self.medium += 1,
            Complexity::High => self.high += 1,
        }
    }

    pub fn get(&self, complexity: Complexity) -> usize {
        match complexity {
            Complexity::Low => self.low,
            Complexity::Medium => self.medium,
            Complexity::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// Count occurrences of each label produced by `key`
pub fn count_by<'a, F>(vms: &'a [ClassifiedVm], key: F) -> Vec<DistributionEntry>
where
    F: Fn(&'a ClassifiedVm) -> String,
{
    let counts = vms.iter().fold(BTreeMap::<String, usize>::new(), |mut acc, vm| {
        *acc.entry(key(vm)).or_default() += 1;
        acc
    });

    let mut entries: Vec<DistributionEntry> = counts
        .into_iter()
        .map(|(label, count)| DistributionEntry { label, count })
        .collect();
    // BTreeMap already yields labels ascending; a stable sort keeps that for ties
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

pub fn distributions(vms: &[ClassifiedVm]) -> Distributions {
    Distributions {
        os_family: count_by(vms, |vm| vm.os_family.to_string()),
        os_consolidated: count_by(vms, |vm| vm.os_consolidated.clone()),
        size_category: count_by(vms, |vm| vm.size_category.to_string()),
        complexity: count_by(vms, |vm| vm.complexity.to_string()),
        status: count_by(vms, |vm| vm.record.status.to_string()),
    }
}

pub fn cluster_rollups(vms: &[ClassifiedVm]) -> BTreeMap<String, ClusterRollup> {
    let mut rollups = vms.iter().fold(BTreeMap::new(), |mut acc, vm| {
        let r = &vm.record;
        let entry: &mut ClusterRollup = acc.entry(r.cluster.clone()).or_default();
        entry.vm_count += 1;
        entry.vcpus += u64::from(r.vcpus);
        entry.memory_gb += r.memory_gb;
        entry.storage_provisioned_gb += r.storage_provisioned_gb;
        entry.storage_used_gb += r.storage_used_gb;
        acc
    });
    for rollup in rollups.values_mut() {
        rollup.storage_provisioned_gb = round_to(rollup.storage_provisioned_gb, 2);
        rollup.storage_used_gb = round_to(rollup.storage_used_gb, 2);
    }
    rollups
}

pub fn host_rollups(vms: &[ClassifiedVm]) -> BTreeMap<String, HostRollup> {
    vms.iter().fold(BTreeMap::new(), |mut acc, vm| {
        let r = &vm.record;
        let entry: &mut HostRollup = acc.entry(r.host.clone()).or_default();
        entry.vm_count += 1;
        entry.vcpus += u64::from(r.vcpus);
        entry.memory_gb += r.memory_gb;
        acc
    })
}

/// Sizing rows in tier order; empty tiers are omitted
pub fn size_details(vms: &[ClassifiedVm]) -> Vec<SizeDetail> {
    SizeCategory::ALL
        .iter()
        .filter_map(|&category| {
            let members: Vec<&ClassifiedVm> =
                vms.iter().filter(|vm| vm.size_category == category).collect();
            if members.is_empty() {
                return None;
            }
            Some(SizeDetail {
                category,
                cpu_range: category.cpu_range().to_string(),
                mem_range: category.mem_range().to_string(),
                vm_count: members.len(),
                vcpus: members.iter().map(|vm| u64::from(vm.record.vcpus)).sum(),
                memory_gb: members.iter().map(|vm| vm.record.memory_gb).sum(),
                storage_gb: round_to(
                    members.iter().map(|vm| vm.record.storage_provisioned_gb).sum(),
                    2,
                ),
            })
        })
        .collect()
}

/// Consolidated OS label → Low/Medium/High counts
pub fn complexity_by_os(vms: &[ClassifiedVm]) -> BTreeMap<String, ComplexityCounts> {
    vms.iter().fold(BTreeMap::new(), |mut acc, vm| {
        acc.entry(vm.os_consolidated.clone())
            .or_insert_with(ComplexityCounts::default)
            .add(vm.complexity);
        acc
    })
}
