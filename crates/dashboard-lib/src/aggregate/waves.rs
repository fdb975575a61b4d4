//! Migration wave bucketing
//!
//! Waves are independent filters, not a partition: Low-complexity Windows
//! and Medium-complexity VMs of unknown family belong to no wave.

use crate::models::{ClassifiedVm, Complexity, OsFamily};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationWave {
    pub wave: u8,
    pub name: String,
    pub description: String,
    pub criteria: String,
    pub vm_count: usize,
    pub vcpus: u64,
    pub memory_gb: u64,
}

struct WaveRule {
    wave: u8,
    name: &'static str,
    description: &'static str,
    criteria: &'static str,
    selects: fn(&ClassifiedVm) -> bool,
}

const WAVE_RULES: [WaveRule; 4] = [
    WaveRule {
        wave: 1,
        name: "Pilot - Low Complexity Linux",
        description: "RHEL 8/9 VMs with standard sizing",
        criteria: "Linux, Low complexity, Small/Medium size",
        selects: |vm| vm.complexity == Complexity::Low && vm.os_family == OsFamily::Linux,
    },
    WaveRule {
        wave: 2,
        name: "Linux Extended",
        description: "RHEL 7 and large Linux VMs",
        criteria: "Linux, Medium complexity (RHEL 7 or >64GB/>16 vCPU)",
        selects: |vm| vm.complexity == Complexity::Medium && vm.os_family == OsFamily::Linux,
    },
    WaveRule {
        wave: 3,
        name: "Windows Standard",
        description: "Windows VMs with standard sizing",
        criteria: "Windows, ≤64GB RAM, ≤16 vCPU",
        selects: |vm| vm.complexity == Complexity::Medium && vm.os_family == OsFamily::Windows,
    },
    WaveRule {
        wave: 4,
        name: "High Complexity",
        description: "Large Windows VMs requiring special attention",
        criteria: "Windows, >64GB RAM or >16 vCPU",
        selects: |vm| vm.complexity == Complexity::High,
    },
];

/// Evaluate every wave rule; waves with no members are left out
pub fn migration_waves(vms: &[ClassifiedVm]) -> Vec<MigrationWave> {
    WAVE_RULES
        .iter()
        .filter_map(|rule| {
            let (vm_count, vcpus, memory_gb) = vms
                .iter()
                .filter(|vm| (rule.selects)(vm))
                .fold((0usize, 0u64, 0u64), |(n, c, m), vm| {
                    (n + 1, c + u64::from(vm.record.vcpus), m + vm.record.memory_gb)
                });
            (vm_count > 0).then(|| MigrationWave {
                wave: rule.wave,
                name: rule.name.to_string(),
                description: rule.description.to_string(),
                criteria: rule.criteria.to_string(),
                vm_count,
                vcpus,
                memory_gb,
            })
        })
        .collect()
}
