//! Compounding growth projection

use crate::aggregate::SummaryStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of future years projected after the base year
pub const FORECAST_HORIZON_YEARS: u32 = 3;

/// Annual VM growth assumption
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scenario", content = "rate")]
pub enum GrowthScenario {
    Conservative,
    #[default]
    Typical,
    Aggressive,
    Custom(f64),
}

impl GrowthScenario {
    /// Named scenarios in the order they are offered to users
    pub const NAMED: [GrowthScenario; 3] = [Self::Conservative, Self::Typical, Self::Aggressive];

    /// Annual growth in percent
    pub fn rate_percent(&self) -> f64 {
        match self {
            Self::Conservative => 5.0,
            Self::Typical => 15.0,
            Self::Aggressive => 25.0,
            Self::Custom(rate) => *rate,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Typical => "typical",
            Self::Aggressive => "aggressive",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for GrowthScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conservative => write!(f, "Conservative (5%)"),
            Self::Typical => write!(f, "Typical (15%)"),
            Self::Aggressive => write!(f, "Aggressive (25%)"),
            Self::Custom(rate) => write!(f, "Custom ({rate}%)"),
        }
    }
}

impl FromStr for GrowthScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "typical" => Ok(Self::Typical),
            "aggressive" => Ok(Self::Aggressive),
            other => {
                let rate: f64 = other
                    .trim_end_matches('%')
                    .trim()
                    .parse()
                    .map_err(|_| format!("unknown growth scenario '{trimmed}'"))?;
                if rate.is_finite() && rate >= 0.0 {
                    Ok(Self::Custom(rate))
                } else {
                    Err(format!("growth rate must be a non-negative number, got '{trimmed}'"))
                }
            }
        }
    }
}

/// Totals the projection starts from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentTotals {
    pub vms: u64,
    pub vcpus: u64,
    pub memory_gb: u64,
}

impl From<&SummaryStats> for CurrentTotals {
    fn from(stats: &SummaryStats) -> Self {
        Self {
            vms: stats.total_vms as u64,
            vcpus: stats.total_vcpus,
            memory_gb: stats.total_memory_gb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: i32,
    pub offset: u32,
    pub vms: u64,
    pub vcpus: u64,
    pub memory_gb: u64,
}

/// ceil(value × (1 + rate/100)^offset)
///
/// The factor is built by repeated multiplication so the report script,
/// which does the same, lands on identical integers.
pub fn grow(value: u64, rate_percent: f64, offset: u32) -> u64 {
    if offset == 0 {
        return value;
    }
    let step = 1.0 + rate_percent / 100.0;
    let factor = (0..offset).fold(1.0_f64, |acc, _| acc * step);
    (value as f64 * factor).ceil() as u64
}

/// Project totals for `base_year` and each year of the horizon
pub fn project(current: CurrentTotals, rate_percent: f64, base_year: i32) -> Vec<YearProjection> {
    (0..=FORECAST_HORIZON_YEARS)
        .map(|offset| YearProjection {
            year: base_year + offset as i32,
            offset,
            vms: grow(current.vms, rate_percent, offset),
            vcpus: grow(current.vcpus, rate_percent, offset),
            memory_gb: grow(current.memory_gb, rate_percent, offset),
        })
        .collect()
}
