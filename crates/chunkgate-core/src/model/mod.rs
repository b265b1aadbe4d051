pub mod budget;
pub mod config;
pub mod ids;
pub mod performance;
pub mod request;
pub mod state;

pub use budget::{BudgetStrategy, ResourceBudget, ResourceBudgetPayload};
pub use config::SystemConfig;
pub use ids::{BudgetId, ChunkId, EpochMillis, FailureReason, RequestId, StrategyId};
pub use performance::{
    PerformanceSnapshot, PerformanceWindow, PerformanceWindowPayload, ThroughputSummary,
    ThroughputSummaryPayload,
};
pub use request::{ChunkAction, ChunkRequest, ChunkRequestPayload, Priority};
pub use state::{make_initial_state, ChunkSystemState, ChunkSystemStatePayload, QueueKind};
