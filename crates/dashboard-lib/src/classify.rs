//! Per-VM classification
//!
//! Every derived field is a pure function of primitive inputs so it can be
//! tested without building a record.

use crate::models::{ClassifiedVm, Complexity, OsFamily, SizeCategory, VmRecord, UNKNOWN_LABEL};
use crate::models::round_to;
use regex::Regex;
use std::sync::OnceLock;

/// Memory above this (GB) marks a VM as large for sizing and complexity
pub const XLARGE_MEMORY_GB: u64 = 64;
/// vCPUs above this mark a VM as large for sizing and complexity
pub const XLARGE_VCPUS: u32 = 16;
pub const LARGE_MEMORY_GB: u64 = 32;
pub const LARGE_VCPUS: u32 = 8;
pub const MEDIUM_MEMORY_GB: u64 = 8;
pub const MEDIUM_VCPUS: u32 = 4;

struct OsPatterns {
    rhel: Regex,
    windows_server: Regex,
    windows_client: Regex,
}

fn os_patterns() -> &'static OsPatterns {
    static PATTERNS: OnceLock<OsPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| OsPatterns {
        rhel: Regex::new(r"(?i)^(?:RHEL|Red Hat Enterprise Linux)\s*(\d+)")
            .expect("valid RHEL pattern"),
        windows_server: Regex::new(r"(?i)^Windows\s*(?:Server\s*)?(\d+)")
            .expect("valid Windows Server pattern"),
        windows_client: Regex::new(r"(?i)^Windows\s*(\d+)").expect("valid Windows pattern"),
    })
}

pub fn os_family(guest_os: Option<&str>) -> OsFamily {
    match guest_os {
        None => OsFamily::Unknown,
        Some(os) if os.to_lowercase().contains("windows") => OsFamily::Windows,
        Some(_) => OsFamily::Linux,
    }
}

/// Collapse minor versions into a reporting label ("RHEL 8.6" → "RHEL 8")
pub fn consolidated_os(guest_os: Option<&str>) -> String {
    let Some(raw) = guest_os else {
        return UNKNOWN_LABEL.to_string();
    };
    let os = raw.trim();
    let patterns = os_patterns();

    if let Some(caps) = patterns.rhel.captures(os) {
        return format!("RHEL {}", &caps[1]);
    }
    if os.to_lowercase().contains("windows") {
        if let Some(caps) = patterns.windows_server.captures(os) {
            return format!("Windows {}", &caps[1]);
        }
        if let Some(caps) = patterns.windows_client.captures(os) {
            return format!("Windows {}", &caps[1]);
        }
    }
    os.to_string()
}

fn is_oversized(memory_gb: u64, vcpus: u32) -> bool {
    memory_gb > XLARGE_MEMORY_GB || vcpus > XLARGE_VCPUS
}

pub fn size_category(memory_gb: u64, vcpus: u32) -> SizeCategory {
    if is_oversized(memory_gb, vcpus) {
        SizeCategory::XLarge
    } else if memory_gb > LARGE_MEMORY_GB || vcpus > LARGE_VCPUS {
        SizeCategory::Large
    } else if memory_gb > MEDIUM_MEMORY_GB || vcpus > MEDIUM_VCPUS {
        SizeCategory::Medium
    } else {
        SizeCategory::Small
    }
}

pub fn migration_complexity(
    guest_os: Option<&str>,
    family: OsFamily,
    memory_gb: u64,
    vcpus: u32,
) -> Complexity {
    let oversized = is_oversized(memory_gb, vcpus);

    if family == OsFamily::Windows {
        return if oversized {
            Complexity::High
        } else {
            Complexity::Medium
        };
    }

    let os_lower = guest_os.unwrap_or_default().to_lowercase();
    let is_rhel7 = os_lower.contains("rhel 7") || os_lower.contains("rhel7");
    if is_rhel7 || oversized {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

/// Used / provisioned as a percentage with one decimal, 0 when nothing is provisioned
pub fn storage_efficiency(used_gb: f64, provisioned_gb: f64) -> f64 {
    if provisioned_gb > 0.0 {
        round_to(used_gb / provisioned_gb * 100.0, 1)
    } else {
        0.0
    }
}

/// Attach all derived fields to a cleaned record
pub fn classify(record: VmRecord) -> ClassifiedVm {
    let guest_os = record.guest_os.as_deref();
    let family = os_family(guest_os);

    ClassifiedVm {
        os_family: family,
        os_consolidated: consolidated_os(guest_os),
        size_category: size_category(record.memory_gb, record.vcpus),
        complexity: migration_complexity(guest_os, family, record.memory_gb, record.vcpus),
        storage_efficiency: storage_efficiency(
            record.storage_used_gb,
            record.storage_provisioned_gb,
        ),
        record,
    }
}

pub fn classify_all(records: Vec<VmRecord>) -> Vec<ClassifiedVm> {
    records.into_iter().map(classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PowerStatus;
    use proptest::prelude::*;

    fn record(guest_os: Option<&str>, memory_gb: u64, vcpus: u32) -> VmRecord {
        VmRecord {
            name: "vm".into(),
            cluster: "CLU01".into(),
            host: "host01".into(),
            storage_pool: "pool".into(),
            guest_os: guest_os.map(String::from),
            status: PowerStatus::Off,
            memory_gb,
            vcpus,
            storage_provisioned_gb: 200.0,
            storage_used_gb: 9.2,
            creation_date: None,
        }
    }

    #[test]
    fn test_small_rhel8_is_low_complexity() {
        let vm = classify(record(Some("RHEL 8.6"), 8, 4));
        assert_eq!(vm.size_category, SizeCategory::Small);
        assert_eq!(vm.complexity, Complexity::Low);
        assert_eq!(vm.os_family, OsFamily::Linux);
        assert_eq!(vm.os_consolidated, "RHEL 8");
        assert_eq!(vm.storage_efficiency, 4.6);
    }

    #[test]
    fn test_large_windows_server_is_high_complexity() {
        let vm = classify(record(Some("Windows Server 2022"), 128, 32));
        assert_eq!(vm.size_category, SizeCategory::XLarge);
        assert_eq!(vm.complexity, Complexity::High);
        assert_eq!(vm.os_family, OsFamily::Windows);
        assert_eq!(vm.os_consolidated, "Windows 2022");
    }

    #[test]
    fn test_rhel7_override() {
        let vm = classify(record(Some("RHEL 7.9"), 4, 2));
        assert_eq!(vm.size_category, SizeCategory::Small);
        assert_eq!(vm.complexity, Complexity::Medium);
        assert_eq!(
            migration_complexity(Some("rhel7_x64"), OsFamily::Linux, 2, 1),
            Complexity::Medium
        );
    }

    #[test]
    fn test_size_boundaries_are_exclusive() {
        assert_eq!(size_category(64, 16), SizeCategory::Large);
        assert_eq!(size_category(65, 1), SizeCategory::XLarge);
        assert_eq!(size_category(1, 17), SizeCategory::XLarge);
        assert_eq!(size_category(32, 8), SizeCategory::Medium);
        assert_eq!(size_category(33, 1), SizeCategory::Large);
        assert_eq!(size_category(8, 4), SizeCategory::Small);
        assert_eq!(size_category(9, 1), SizeCategory::Medium);
        assert_eq!(size_category(0, 0), SizeCategory::Small);
    }

    #[test]
    fn test_standard_windows_is_medium() {
        assert_eq!(
            migration_complexity(Some("Windows 10"), OsFamily::Windows, 8, 2),
            Complexity::Medium
        );
    }

    #[test]
    fn test_oversized_linux_is_medium_not_high() {
        assert_eq!(
            migration_complexity(Some("RHEL 9.2"), OsFamily::Linux, 256, 4),
            Complexity::Medium
        );
    }

    #[test]
    fn test_os_family() {
        assert_eq!(os_family(Some("Microsoft WINDOWS Server")), OsFamily::Windows);
        assert_eq!(os_family(Some("Ubuntu 22.04")), OsFamily::Linux);
        assert_eq!(os_family(Some("")), OsFamily::Linux);
        assert_eq!(os_family(None), OsFamily::Unknown);
    }

    #[test]
    fn test_consolidated_os_patterns() {
        assert_eq!(consolidated_os(Some("Red Hat Enterprise Linux 9.2")), "RHEL 9");
        assert_eq!(consolidated_os(Some("rhel9")), "RHEL 9");
        assert_eq!(consolidated_os(Some("Windows Server 2019 Datacenter")), "Windows 2019");
        assert_eq!(consolidated_os(Some("Windows 11 Enterprise")), "Windows 11");
        assert_eq!(consolidated_os(Some("  Ubuntu 22.04  ")), "Ubuntu 22.04");
        // anchored: a vendor prefix passes through unchanged
        assert_eq!(
            consolidated_os(Some("Microsoft Windows Server 2016")),
            "Microsoft Windows Server 2016"
        );
        assert_eq!(consolidated_os(None), "Unknown");
    }

    #[test]
    fn test_storage_efficiency_guards_zero() {
        assert_eq!(storage_efficiency(50.0, 0.0), 0.0);
        assert_eq!(storage_efficiency(1.0, 3.0), 33.3);
        assert_eq!(storage_efficiency(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_unknown_os_is_treated_as_linux_for_complexity() {
        let vm = classify(record(None, 16, 2));
        assert_eq!(vm.os_family, OsFamily::Unknown);
        assert_eq!(vm.complexity, Complexity::Low);
    }

    proptest! {
        #[test]
        fn prop_size_is_monotonic(mem in 0u64..512, cpus in 0u32..64, dm in 0u64..128, dc in 0u32..32) {
            let base = size_category(mem, cpus);
            prop_assert!(size_category(mem + dm, cpus) >= base);
            prop_assert!(size_category(mem, cpus + dc) >= base);
        }

        #[test]
        fn prop_classification_is_deterministic(
            os in proptest::option::of("[A-Za-z0-9 .]{0,24}"),
            mem in 0u64..512,
            cpus in 0u32..64,
        ) {
            let a = classify(record(os.as_deref(), mem, cpus));
            let b = classify(record(os.as_deref(), mem, cpus));
            prop_assert_eq!(a, b);
        }
    }
}
