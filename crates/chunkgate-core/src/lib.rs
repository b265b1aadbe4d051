//! chunkgate Core - chunk admission & scheduling state machine
//!
//! This crate provides the pure half of chunkgate:
//! - Validated domain types (requests, budgets, performance snapshots, state)
//! - The command/event vocabulary and decoding of external payloads
//! - The `apply_command()` transition function that holds every business rule
//! - The clock collaborator, error taxonomy and logging facility
//!
//! Persistence lives in `chunkgate-store`, orchestration in `chunkgate-engine`.

pub mod apply;
pub mod clock;
pub mod commands;
pub mod decode;
pub mod errors;
pub mod events;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;

// Paths used by the logging macros
#[doc(hidden)]
pub use chunkgate_core_types as __core_types;
#[doc(hidden)]
pub use tracing as __tracing;

// Re-export commonly used types
pub use apply::{apply_command, Transition};
pub use clock::{Clock, ManualClock, SystemClock};
pub use commands::Command;
pub use errors::{ChunkSystemError, ExError, ExErrorKind, Result};
pub use events::ChunkEvent;
pub use model::{
    make_initial_state, BudgetId, BudgetStrategy, ChunkAction, ChunkId, ChunkRequest,
    ChunkSystemState, EpochMillis, FailureReason, PerformanceSnapshot, PerformanceWindow,
    Priority, RequestId, ResourceBudget, StrategyId, SystemConfig, ThroughputSummary,
};
