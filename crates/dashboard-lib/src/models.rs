//! Core data models for the migration dashboard

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used when a grouping field is absent from the source row
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Power state of a virtual machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerStatus {
    On,
    Off,
    Unknown,
}

impl PowerStatus {
    /// Normalize the many spellings hypervisor exports use for power state
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "on" | "up" | "running" | "powered on" | "poweredon" | "true" | "1" => Self::On,
            "off" | "down" | "stopped" | "powered off" | "poweredoff" | "false" | "0" => {
                Self::Off
            }
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// Operating system family derived from the guest OS string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OsFamily {
    Linux,
    Windows,
    Unknown,
}

impl OsFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// Four-tier size classification, ordered smallest to largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    #[serde(rename = "X-Large")]
    XLarge,
}

impl SizeCategory {
    pub const ALL: [SizeCategory; 4] = [Self::Small, Self::Medium, Self::Large, Self::XLarge];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::XLarge => "X-Large",
        }
    }

    /// Static vCPU range label shown in the sizing table
    pub fn cpu_range(&self) -> &'static str {
        match self {
            Self::Small => "≤4",
            Self::Medium => "≤8",
            Self::Large => "≤16",
            Self::XLarge => ">16",
        }
    }

    /// Static memory range label shown in the sizing table
    pub fn mem_range(&self) -> &'static str {
        match self {
            Self::Small => "≤8 GB",
            Self::Medium => "≤32 GB",
            Self::Large => "≤64 GB",
            Self::XLarge => ">64 GB",
        }
    }
}

/// Estimated migration effort, ordered lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(PowerStatus, OsFamily, SizeCategory, Complexity);

/// A cleaned inventory row with coerced types
#[derive(Debug, Clone, PartialEq)]
pub struct VmRecord {
    pub name: String,
    pub cluster: String,
    pub host: String,
    pub storage_pool: String,
    pub guest_os: Option<String>,
    pub status: PowerStatus,
    pub memory_gb: u64,
    pub vcpus: u32,
    pub storage_provisioned_gb: f64,
    pub storage_used_gb: f64,
    pub creation_date: Option<NaiveDateTime>,
}

/// A VM record with its derived classification attached
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedVm {
    pub record: VmRecord,
    pub os_family: OsFamily,
    pub os_consolidated: String,
    pub size_category: SizeCategory,
    pub complexity: Complexity,
    pub storage_efficiency: f64,
}

/// Inventory row embedded in the report for client-side filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub vm_name: String,
    pub cluster: String,
    pub guest_os: String,
    pub host: String,
    pub status: String,
    pub memory_gb: u64,
    pub vcpus: u32,
    pub storage_gb: f64,
    pub used_gb: f64,
    pub utilization: f64,
    pub size_category: SizeCategory,
    pub complexity: Complexity,
    pub os_family: OsFamily,
    pub os_consolidated: String,
    pub creation_date: String,
}

impl From<&ClassifiedVm> for InventoryRow {
    fn from(vm: &ClassifiedVm) -> Self {
        let r = &vm.record;
        Self {
            vm_name: r.name.clone(),
            cluster: r.cluster.clone(),
            guest_os: r.guest_os.clone().unwrap_or_default(),
            host: r.host.clone(),
            status: r.status.to_string(),
            memory_gb: r.memory_gb,
            vcpus: r.vcpus,
            storage_gb: round_to(r.storage_provisioned_gb, 2),
            used_gb: round_to(r.storage_used_gb, 2),
            utilization: round_to(vm.storage_efficiency, 1),
            size_category: vm.size_category,
            complexity: vm.complexity,
            os_family: vm.os_family,
            os_consolidated: vm.os_consolidated.clone(),
            creation_date: r
                .creation_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_status_spellings() {
        assert_eq!(PowerStatus::parse("On"), PowerStatus::On);
        assert_eq!(PowerStatus::parse(" up "), PowerStatus::On);
        assert_eq!(PowerStatus::parse("Powered Off"), PowerStatus::Off);
        assert_eq!(PowerStatus::parse("down"), PowerStatus::Off);
        assert_eq!(PowerStatus::parse("suspended"), PowerStatus::Unknown);
        assert_eq!(PowerStatus::parse(""), PowerStatus::Unknown);
    }

    #[test]
    fn test_size_category_serializes_with_hyphen() {
        let json = serde_json::to_string(&SizeCategory::XLarge).unwrap();
        assert_eq!(json, "\"X-Large\"");
        assert_eq!(SizeCategory::XLarge.to_string(), "X-Large");
    }

    #[test]
    fn test_tier_ordering() {
        assert!(SizeCategory::Small < SizeCategory::Medium);
        assert!(SizeCategory::Large < SizeCategory::XLarge);
        assert!(Complexity::Low < Complexity::High);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(12.35, 0), 12.0);
        assert_eq!(round_to(0.0, 2), 0.0);
    }
}
