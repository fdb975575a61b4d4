//! Capacity forecast engine

mod growth;
mod sizing;

pub use growth::{
    grow, project, CurrentTotals, GrowthScenario, YearProjection, FORECAST_HORIZON_YEARS,
};
pub use sizing::{
    apportion, nodes_required, plan_infrastructure, ClusterSizing, InfrastructurePlan, NodeSize,
    NodeSpec, MIN_NODES, OVERHEAD_PERCENT,
};

use crate::aggregate::Snapshot;
use serde::{Deserialize, Serialize};

/// Forecast settings chosen by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastOptions {
    pub scenario: GrowthScenario,
    pub node_size: NodeSize,
}

/// Multi-year projection plus the infrastructure plan for its last year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub scenario: GrowthScenario,
    pub rate_percent: f64,
    pub base_year: i32,
    pub current: CurrentTotals,
    pub years: Vec<YearProjection>,
    pub plan: InfrastructurePlan,
}

impl Forecast {
    pub fn compute(snapshot: &Snapshot, options: ForecastOptions, base_year: i32) -> Self {
        let current = CurrentTotals::from(&snapshot.stats);
        let rate_percent = options.scenario.rate_percent();
        let years = project(current, rate_percent, base_year);

        // project() always yields the base year, so `last` is present
        let target = years.last().copied().unwrap_or(YearProjection {
            year: base_year,
            offset: 0,
            vms: current.vms,
            vcpus: current.vcpus,
            memory_gb: current.memory_gb,
        });
        let plan = plan_infrastructure(
            &snapshot.by_cluster,
            current.vms,
            &target,
            options.node_size,
        );

        Self {
            scenario: options.scenario,
            rate_percent,
            base_year,
            current,
            years,
            plan,
        }
    }

    pub fn target_year(&self) -> Option<&YearProjection> {
        self.years.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOption {
    pub key: String,
    pub label: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOption {
    pub key: String,
    pub label: String,
    pub spec: NodeSpec,
}

/// Constants the report script needs to recompute forecasts in the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConstants {
    pub overhead_percent: u64,
    pub min_nodes: u64,
    pub horizon_years: u32,
    pub base_year: i32,
    pub default_scenario: String,
    pub default_rate: f64,
    pub default_node_size: String,
    pub scenarios: Vec<ScenarioOption>,
    pub node_sizes: Vec<NodeOption>,
}

impl ForecastConstants {
    pub fn new(options: ForecastOptions, base_year: i32) -> Self {
        Self {
            overhead_percent: OVERHEAD_PERCENT,
            min_nodes: MIN_NODES,
            horizon_years: FORECAST_HORIZON_YEARS,
            base_year,
            default_scenario: options.scenario.key().to_string(),
            default_rate: options.scenario.rate_percent(),
            default_node_size: options.node_size.key().to_string(),
            scenarios: GrowthScenario::NAMED
                .iter()
                .map(|s| ScenarioOption {
                    key: s.key().to_string(),
                    label: s.to_string(),
                    rate: s.rate_percent(),
                })
                .collect(),
            node_sizes: NodeSize::ALL
                .iter()
                .map(|n| NodeOption {
                    key: n.key().to_string(),
                    label: n.label(),
                    spec: n.spec(),
                })
                .collect(),
        }
    }
}
