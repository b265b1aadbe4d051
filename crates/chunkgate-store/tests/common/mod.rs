use chunkgate_core::model::{
    BudgetId, BudgetStrategy, ChunkAction, ChunkId, ChunkRequest, EpochMillis, PerformanceWindow,
    Priority, RequestId, ResourceBudget, StrategyId, SystemConfig,
};
use chunkgate_core::{
    apply_command, make_initial_state, ChunkSystemState, Command, ManualClock, Transition,
};

pub fn config(max_concurrent: u32) -> SystemConfig {
    SystemConfig {
        initial_budget: ResourceBudget::new(
            BudgetId::new("store-budget").unwrap(),
            BudgetStrategy::Adaptive,
            max_concurrent,
            128.0,
            25.0,
        )
        .unwrap(),
        initial_strategy: StrategyId::new("adaptive").unwrap(),
        performance_window: PerformanceWindow::new(500, 0.0, 0.0).unwrap(),
    }
}

pub fn initial() -> ChunkSystemState {
    make_initial_state(&config(4), EpochMillis::from_millis(0))
}

/// Schedule one fresh request against `state`
pub fn scheduled(state: &ChunkSystemState, chunk: &str) -> Transition {
    let clock = ManualClock::new(EpochMillis::from_millis(10));
    let request = ChunkRequest::new(
        RequestId::generate(),
        ChunkId::new(chunk).unwrap(),
        Priority::High,
        ChunkAction::Warmup,
        EpochMillis::from_millis(0),
        EpochMillis::from_millis(1_000),
    )
    .unwrap();
    apply_command(state, Command::Schedule { request }, &clock).unwrap()
}
