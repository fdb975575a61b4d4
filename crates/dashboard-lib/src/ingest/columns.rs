//! Column resolution
//!
//! Exports from different hypervisor versions (and hand-edited sheets) name
//! the same column differently. Each canonical field carries an ordered alias
//! list; the first alias that matches any header wins.

use super::CellValue;
use crate::error::{DashboardError, Result};
use std::collections::HashMap;

/// Canonical inventory fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    VmName,
    ClusterName,
    StoragePoolName,
    GuestOs,
    VmHost,
    Status,
    MemSizeGb,
    NumOfCpus,
    StorageSizeGb,
    UsedSizeGb,
    CreationDate,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl Field {
    pub const ALL: [Field; 11] = [
        Field::VmName,
        Field::ClusterName,
        Field::StoragePoolName,
        Field::GuestOs,
        Field::VmHost,
        Field::Status,
        Field::MemSizeGb,
        Field::NumOfCpus,
        Field::StorageSizeGb,
        Field::UsedSizeGb,
        Field::CreationDate,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Field::VmName => "vm_name",
            Field::ClusterName => "cluster_name",
            Field::StoragePoolName => "storage_pool_name",
            Field::GuestOs => "guest_os",
            Field::VmHost => "vm_host",
            Field::Status => "status",
            Field::MemSizeGb => "mem_size_GB",
            Field::NumOfCpus => "num_of_cpus",
            Field::StorageSizeGb => "storage_size_GB",
            Field::UsedSizeGb => "used_size_GB",
            Field::CreationDate => "creation_date",
        }
    }

    /// Accepted header spellings in priority order
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::VmName => &["vm_name", "name", "vm"],
            Field::ClusterName => &["cluster_name", "cluster"],
            Field::StoragePoolName => &["storage_pool_name", "storage_pool", "storage_domain"],
            Field::GuestOs => &["guest_os", "os", "operating_system"],
            Field::VmHost => &["vm_host", "host", "hypervisor"],
            Field::Status => &["On/Off", "status", "power_state", "state"],
            Field::MemSizeGb => &["mem_size_GB", "memory", "ram", "mem_gb"],
            Field::NumOfCpus => &["num_of_cpus", "vcpus", "cpus", "cpu"],
            Field::StorageSizeGb => &[
                "storage_size-GB",
                "storage_size_GB",
                "provisioned_storage",
                "storage",
            ],
            Field::UsedSizeGb => &["used_size-GB", "used_size_GB", "used_storage"],
            Field::CreationDate => &["creation_date", "created", "create_date"],
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Field::VmName)
    }
}

/// Find the header index matching any alias of `field`
pub fn find_column(headers: &[String], field: Field) -> Option<usize> {
    field.aliases().iter().find_map(|alias| {
        let wanted = alias.trim().to_lowercase();
        headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    })
}

/// Resolved header positions for every canonical field found in the source
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: HashMap<Field, usize>,
}

impl ColumnMap {
    /// Resolve all fields, failing if a required one is missing
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let mut indices = HashMap::new();
        for field in Field::ALL {
            match find_column(headers, field) {
                Some(idx) => {
                    indices.insert(field, idx);
                }
                None if field.is_required() => {
                    return Err(DashboardError::MissingColumn {
                        field: field.canonical_name(),
                        aliases: field.aliases().join(", "),
                    });
                }
                None => {}
            }
        }
        Ok(Self { indices })
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.indices.contains_key(&field)
    }

    /// Cell for `field` in `row`, or an empty cell when the column is absent
    /// or the row is short
    pub fn cell<'a>(&self, row: &'a [CellValue], field: Field) -> &'a CellValue {
        self.index(field)
            .and_then(|idx| row.get(idx))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Headers with every matched column renamed to its canonical name
    pub fn canonical_headers(&self, headers: &[String]) -> Vec<String> {
        let mut renamed = headers.to_vec();
        for (field, idx) in &self.indices {
            if let Some(h) = renamed.get_mut(*idx) {
                *h = field.canonical_name().to_string();
            }
        }
        renamed
    }

    /// Canonical fields that were not present in the source
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.indices.contains_key(f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_trimmed_match() {
        let h = headers(&["  NAME ", "Cluster", "MEMORY"]);
        assert_eq!(find_column(&h, Field::VmName), Some(0));
        assert_eq!(find_column(&h, Field::ClusterName), Some(1));
        assert_eq!(find_column(&h, Field::MemSizeGb), Some(2));
        assert_eq!(find_column(&h, Field::GuestOs), None);
    }

    #[test]
    fn test_status_aliases() {
        assert_eq!(find_column(&headers(&["x", "On/Off"]), Field::Status), Some(1));
        assert_eq!(find_column(&headers(&["power_state"]), Field::Status), Some(0));
    }

    #[test]
    fn test_alias_priority_wins_over_column_order() {
        // "vm" appears first but "vm_name" is the higher-priority alias
        let h = headers(&["vm", "vm_name"]);
        assert_eq!(find_column(&h, Field::VmName), Some(1));
    }

    #[test]
    fn test_hyphenated_storage_headers() {
        let h = headers(&["storage_size-GB", "used_size-GB"]);
        assert_eq!(find_column(&h, Field::StorageSizeGb), Some(0));
        assert_eq!(find_column(&h, Field::UsedSizeGb), Some(1));
    }

    #[test]
    fn test_missing_required_column_fails() {
        let err = ColumnMap::resolve(&headers(&["cluster", "memory"])).unwrap_err();
        match err {
            DashboardError::MissingColumn { field, aliases } => {
                assert_eq!(field, "vm_name");
                assert!(aliases.contains("name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let map = ColumnMap::resolve(&headers(&["vm"])).unwrap();
        assert!(map.contains(Field::VmName));
        assert_eq!(map.missing_fields().len(), Field::ALL.len() - 1);

        let row = vec![CellValue::Text("web01".into())];
        assert_eq!(map.cell(&row, Field::MemSizeGb), &CellValue::Empty);
    }

    #[test]
    fn test_canonical_headers() {
        let h = headers(&["Name", "extra", "vCPUs"]);
        let map = ColumnMap::resolve(&h).unwrap();
        assert_eq!(
            map.canonical_headers(&h),
            headers(&["vm_name", "extra", "num_of_cpus"])
        );
    }
}
