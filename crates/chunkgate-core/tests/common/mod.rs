use chunkgate_core::model::{
    BudgetId, BudgetStrategy, ChunkAction, ChunkId, ChunkRequest, EpochMillis, PerformanceWindow,
    Priority, RequestId, ResourceBudget, StrategyId, SystemConfig,
};
use chunkgate_core::{apply_command, make_initial_state, ChunkSystemState, Command, ManualClock};

/// Config with the given concurrency and a 1s window
#[allow(dead_code)]
pub fn test_config(max_concurrent: u32) -> SystemConfig {
    SystemConfig {
        initial_budget: ResourceBudget::new(
            BudgetId::new("test-budget").unwrap(),
            BudgetStrategy::Strict,
            max_concurrent,
            512.0,
            100.0,
        )
        .unwrap(),
        initial_strategy: StrategyId::new("strict").unwrap(),
        performance_window: PerformanceWindow::new(1000, 0.0, 0.0).unwrap(),
    }
}

/// Fresh state plus a clock frozen at `now`
#[allow(dead_code)]
pub fn fresh(max_concurrent: u32, now: u64) -> (ChunkSystemState, ManualClock) {
    let clock = ManualClock::new(EpochMillis::from_millis(now));
    let state = make_initial_state(&test_config(max_concurrent), EpochMillis::from_millis(now));
    (state, clock)
}

/// Request with a random id for `chunk`, created at `created_at`
#[allow(dead_code)]
pub fn request(chunk: &str, created_at: u64, deadline: u64) -> ChunkRequest {
    ChunkRequest::new(
        RequestId::generate(),
        ChunkId::new(chunk).unwrap(),
        Priority::Normal,
        ChunkAction::Load,
        EpochMillis::from_millis(created_at),
        EpochMillis::from_millis(deadline),
    )
    .unwrap()
}

/// Apply a Schedule and return the new state, panicking on failure
#[allow(dead_code)]
pub fn schedule(state: &ChunkSystemState, req: &ChunkRequest, clock: &ManualClock) -> ChunkSystemState {
    apply_command(
        state,
        Command::Schedule {
            request: req.clone(),
        },
        clock,
    )
    .unwrap()
    .state
}
