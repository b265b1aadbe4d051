use serde::{Deserialize, Serialize};

use super::budget::ResourceBudget;
use super::ids::StrategyId;
use super::performance::PerformanceWindow;

/// Startup configuration, consumed once to build a fresh state
///
/// Every field validates itself on deserialization, so a parsed
/// `SystemConfig` is always usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    pub initial_budget: ResourceBudget,
    pub initial_strategy: StrategyId,
    pub performance_window: PerformanceWindow,
}
