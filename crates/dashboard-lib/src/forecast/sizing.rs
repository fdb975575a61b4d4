//! Target infrastructure sizing per cluster

use super::growth::YearProjection;
use crate::aggregate::ClusterRollup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Headroom added on top of projected load, in percent
pub const OVERHEAD_PERCENT: u64 = 20;

/// High-availability floor for every cluster
pub const MIN_NODES: u64 = 3;

/// Capacity of one worker node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub cores: u64,
    pub vcpus: u64,
    pub memory_gb: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl NodeSize {
    pub const ALL: [NodeSize; 3] = [Self::Small, Self::Medium, Self::Large];

    pub fn spec(&self) -> NodeSpec {
        match self {
            Self::Small => NodeSpec {
                cores: 32,
                vcpus: 64,
                memory_gb: 512,
            },
            Self::Medium => NodeSpec {
                cores: 64,
                vcpus: 128,
                memory_gb: 1024,
            },
            Self::Large => NodeSpec {
                cores: 128,
                vcpus: 256,
                memory_gb: 2048,
            },
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Human label, e.g. "Medium (64 cores, 1024 GB)"
    pub fn label(&self) -> String {
        let spec = self.spec();
        let name = match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        };
        format!("{name} ({} cores, {} GB)", spec.cores, spec.memory_gb)
    }
}

impl fmt::Display for NodeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NodeSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(format!(
                "unknown node size '{other}' (expected small, medium or large)"
            )),
        }
    }
}

/// Nodes needed to host the load with overhead, never below the HA floor
pub fn nodes_required(vcpus: u64, memory_gb: u64, spec: NodeSpec) -> u64 {
    let with_overhead = |load: u64, capacity: u64| {
        load.saturating_mul(100 + OVERHEAD_PERCENT)
            .div_ceil(capacity.max(1).saturating_mul(100))
    };
    let by_cpu = with_overhead(vcpus, spec.vcpus);
    let by_memory = with_overhead(memory_gb, spec.memory_gb);
    MIN_NODES.max(by_cpu).max(by_memory)
}

/// Share of a global projection attributed to one cluster
pub fn apportion(projected: u64, cluster_vms: u64, total_vms: u64) -> u64 {
    if total_vms == 0 {
        return 0;
    }
    let ratio = cluster_vms as f64 / total_vms as f64;
    (projected as f64 * ratio).ceil() as u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSizing {
    pub cluster: String,
    pub current_vms: u64,
    pub projected_vms: u64,
    pub projected_vcpus: u64,
    pub projected_memory_gb: u64,
    pub nodes: u64,
}

/// Node counts for every cluster in the target year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructurePlan {
    pub year: i32,
    pub node_size: NodeSize,
    pub clusters: Vec<ClusterSizing>,
    pub total_current_vms: u64,
    pub total_projected_vms: u64,
    pub total_projected_vcpus: u64,
    pub total_projected_memory_gb: u64,
    pub total_nodes: u64,
}

/// Distribute `target` over clusters by current VM share and size each one
pub fn plan_infrastructure(
    by_cluster: &BTreeMap<String, ClusterRollup>,
    total_vms: u64,
    target: &YearProjection,
    node_size: NodeSize,
) -> InfrastructurePlan {
    let spec = node_size.spec();

    let clusters: Vec<ClusterSizing> = by_cluster
        .iter()
        .map(|(name, rollup)| {
            let current_vms = rollup.vm_count as u64;
            let projected_vcpus = apportion(target.vcpus, current_vms, total_vms);
            let projected_memory_gb = apportion(target.memory_gb, current_vms, total_vms);
            ClusterSizing {
                cluster: name.clone(),
                current_vms,
                projected_vms: apportion(target.vms, current_vms, total_vms),
                projected_vcpus,
                projected_memory_gb,
                nodes: nodes_required(projected_vcpus, projected_memory_gb, spec),
            }
        })
        .collect();

    InfrastructurePlan {
        year: target.year,
        node_size,
        total_current_vms: saturating_total(&clusters, |c| c.current_vms),
        total_projected_vms: saturating_total(&clusters, |c| c.projected_vms),
        total_projected_vcpus: saturating_total(&clusters, |c| c.projected_vcpus),
        total_projected_memory_gb: saturating_total(&clusters, |c| c.projected_memory_gb),
        total_nodes: saturating_total(&clusters, |c| c.nodes),
        clusters,
    }
}

fn saturating_total(clusters: &[ClusterSizing], field: impl Fn(&ClusterSizing) -> u64) -> u64 {
    clusters
        .iter()
        .fold(0_u64, |acc, c| acc.saturating_add(field(c)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_node_count_uses_worst_resource() {
        let spec = NodeSpec {
            cores: 64,
            vcpus: 128,
            memory_gb: 1024,
        };
        // cpu: ceil(1200/128) = 10, memory: ceil(4800/1024) = 5
        assert_eq!(nodes_required(1000, 4000, spec), 10);
        assert_eq!(nodes_required(100, 8000, spec), 10);
    }

    #[test]
    fn test_exact_fit_does_not_round_up() {
        // 160 vCPU × 1.2 = 192 = 3 × 64
        assert_eq!(nodes_required(160, 0, NodeSize::Small.spec()), 3);
        assert_eq!(nodes_required(320, 0, NodeSize::Small.spec()), 6);
    }

    #[test]
    fn test_runaway_projection_saturates() {
        let nodes = nodes_required(u64::MAX, u64::MAX, NodeSize::Large.spec());
        assert!(nodes >= MIN_NODES);

        let mut by_cluster = BTreeMap::new();
        for name in ["CLU01", "CLU02"] {
            by_cluster.insert(
                name.to_string(),
                ClusterRollup {
                    vm_count: 1,
                    ..Default::default()
                },
            );
        }
        let target = YearProjection {
            year: 2028,
            offset: 3,
            vms: u64::MAX,
            vcpus: u64::MAX,
            memory_gb: u64::MAX,
        };
        let plan = plan_infrastructure(&by_cluster, 2, &target, NodeSize::Small);
        assert_eq!(plan.total_projected_vms, u64::MAX);
        assert_eq!(plan.total_current_vms, 2);
    }

    #[test]
    fn test_apportion_by_vm_share() {
        assert_eq!(apportion(153, 1, 4), 39);
        assert_eq!(apportion(153, 0, 4), 0);
        assert_eq!(apportion(153, 4, 0), 0);
    }

    #[test]
    fn test_plan_totals_sum_clusters() {
        let mut by_cluster = BTreeMap::new();
        by_cluster.insert(
            "CLU01".to_string(),
            ClusterRollup {
                vm_count: 3,
                ..Default::default()
            },
        );
        by_cluster.insert(
            "CLU02".to_string(),
            ClusterRollup {
                vm_count: 1,
                ..Default::default()
            },
        );
        let target = YearProjection {
            year: 2027,
            offset: 3,
            vms: 7,
            vcpus: 2000,
            memory_gb: 4000,
        };

        let plan = plan_infrastructure(&by_cluster, 4, &target, NodeSize::Medium);
        assert_eq!(plan.year, 2027);
        assert_eq!(plan.clusters[0].cluster, "CLU01");
        assert_eq!(plan.clusters[0].projected_vms, 6);
        assert_eq!(plan.clusters[0].projected_vcpus, 1500);
        assert_eq!(plan.clusters[0].nodes, 15);
        assert_eq!(plan.clusters[1].projected_vms, 2);
        assert_eq!(plan.clusters[1].nodes, 5);
        assert_eq!(plan.total_projected_vms, 8);
        assert_eq!(plan.total_nodes, 20);
        assert_eq!(plan.total_current_vms, 4);
    }

    #[test]
    fn test_node_size_parsing() {
        assert_eq!("LARGE".parse::<NodeSize>(), Ok(NodeSize::Large));
        assert!("huge".parse::<NodeSize>().is_err());
        assert_eq!(NodeSize::default(), NodeSize::Medium);
        assert_eq!(NodeSize::Medium.label(), "Medium (64 cores, 1024 GB)");
    }

    proptest! {
        #[test]
        fn prop_node_floor(vcpus in 0u64..10_000, mem in 0u64..100_000, size in 0usize..3) {
            let spec = NodeSize::ALL[size].spec();
            let nodes = nodes_required(vcpus, mem, spec);
            prop_assert!(nodes >= MIN_NODES);
            prop_assert!(nodes * spec.vcpus * 100 >= vcpus * 120);
            prop_assert!(nodes * spec.memory_gb * 100 >= mem * 120);
        }
    }
}
