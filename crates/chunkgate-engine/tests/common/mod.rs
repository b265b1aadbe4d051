use std::sync::Arc;

use async_trait::async_trait;
use chunkgate_core::model::{
    BudgetId, BudgetStrategy, ChunkAction, ChunkId, ChunkRequest, EpochMillis, PerformanceWindow,
    Priority, RequestId, ResourceBudget, StrategyId, SystemConfig,
};
use chunkgate_core::{ChunkEvent, ChunkSystemError, ChunkSystemState, ManualClock, Result};
use chunkgate_store::{ChunkRepository, EventBus, EventStream};

#[allow(dead_code)]
pub fn system_config(max_concurrent: u32) -> SystemConfig {
    SystemConfig {
        initial_budget: ResourceBudget::new(
            BudgetId::new("engine-budget").unwrap(),
            BudgetStrategy::Strict,
            max_concurrent,
            256.0,
            40.0,
        )
        .unwrap(),
        initial_strategy: StrategyId::new("strict").unwrap(),
        performance_window: PerformanceWindow::new(1000, 0.0, 0.0).unwrap(),
    }
}

#[allow(dead_code)]
pub fn clock_at(ms: u64) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(EpochMillis::from_millis(ms)))
}

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

/// Repository that can be told to fail loads and saves
#[allow(dead_code)]
pub struct FlakyRepository {
    pub fail_load: bool,
    pub fail_save: std::sync::atomic::AtomicBool,
    pub saves: std::sync::atomic::AtomicUsize,
    bus: EventBus,
}

#[allow(dead_code)]
impl FlakyRepository {
    pub fn new(fail_load: bool, fail_save: bool) -> Self {
        Self {
            fail_load,
            fail_save: std::sync::atomic::AtomicBool::new(fail_save),
            saves: std::sync::atomic::AtomicUsize::new(0),
            bus: EventBus::default(),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl ChunkRepository for FlakyRepository {
    async fn load(&self) -> Result<ChunkSystemState> {
        if self.fail_load {
            return Err(ChunkSystemError::repository("backend offline"));
        }
        Err(ChunkSystemError::repository("nothing stored"))
    }

    async fn save(&self, _state: &ChunkSystemState, events: &[ChunkEvent]) -> Result<()> {
        if self.fail_save.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(ChunkSystemError::repository("disk full"));
        }
        self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.bus.publish(events);
        Ok(())
    }

    fn observe(&self) -> EventStream {
        self.bus.subscribe()
    }
}
