//! Volatile backend
//!
//! Holds the last committed state in a single cell. Nothing survives the
//! process; commits are immediate.

use async_trait::async_trait;
use chunkgate_core::{ChunkEvent, ChunkSystemState};
use tokio::sync::Mutex;

use crate::bus::EventBus;
use crate::errors::{missing_state, Result};
use crate::repo::{ChunkRepository, EventStream};

pub struct InMemoryRepository {
    cell: Mutex<Option<ChunkSystemState>>,
    bus: EventBus,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::with_bus(EventBus::default())
    }

    /// Empty repository whose subscribers buffer `capacity` events
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_bus(EventBus::new(capacity))
    }

    /// Repository that already holds `state`, as if it had been saved
    pub fn seeded(state: ChunkSystemState) -> Self {
        Self {
            cell: Mutex::new(Some(state)),
            bus: EventBus::default(),
        }
    }

    fn with_bus(bus: EventBus) -> Self {
        Self {
            cell: Mutex::new(None),
            bus,
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkRepository for InMemoryRepository {
    async fn load(&self) -> Result<ChunkSystemState> {
        self.cell.lock().await.clone().ok_or_else(|| missing_state("memory"))
    }

    async fn save(&self, state: &ChunkSystemState, events: &[ChunkEvent]) -> Result<()> {
        // Publish under the lock so a concurrent load never sees the new
        // state before its events are out
        let mut cell = self.cell.lock().await;
        *cell = Some(state.clone());
        self.bus.publish(events);

        tracing::debug!(
            tick = state.tick(),
            event_count = events.len() as u64,
            "Committed state to memory"
        );
        Ok(())
    }

    fn observe(&self) -> EventStream {
        self.bus.subscribe()
    }
}
