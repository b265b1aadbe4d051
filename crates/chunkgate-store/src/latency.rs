//! Latency-simulating decorator
//!
//! Wraps any repository and delays every `save` by a fixed amount before
//! delegating. Saves are serialized behind a gate for the whole delay, so
//! commit order matches call order.

use std::time::Duration;

use async_trait::async_trait;
use chunkgate_core::{ChunkEvent, ChunkSystemState};
use tokio::sync::Mutex;

use crate::errors::Result;
use crate::repo::{ChunkRepository, EventStream};

/// Smallest delay applied to a save
pub const MIN_SAVE_LATENCY: Duration = Duration::from_millis(2);

pub struct LatencyRepository<R> {
    inner: R,
    latency: Duration,
    gate: Mutex<()>,
}

impl<R: ChunkRepository> LatencyRepository<R> {
    /// Decorate `inner`; `latency` below [`MIN_SAVE_LATENCY`] is raised to it
    pub fn new(inner: R, latency: Duration) -> Self {
        Self {
            inner,
            latency: latency.max(MIN_SAVE_LATENCY),
            gate: Mutex::new(()),
        }
    }

    /// Decorate `inner` with the minimum latency
    pub fn with_min_latency(inner: R) -> Self {
        Self::new(inner, MIN_SAVE_LATENCY)
    }

    /// Delay applied to each save
    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: ChunkRepository> ChunkRepository for LatencyRepository<R> {
    async fn load(&self) -> Result<ChunkSystemState> {
        self.inner.load().await
    }

    async fn save(&self, state: &ChunkSystemState, events: &[ChunkEvent]) -> Result<()> {
        let _gate = self.gate.lock().await;
        tokio::time::sleep(self.latency).await;
        self.inner.save(state, events).await
    }

    fn observe(&self) -> EventStream {
        self.inner.observe()
    }
}
