use serde::{Deserialize, Serialize};

use super::budget::ResourceBudget;
use super::config::SystemConfig;
use super::ids::{EpochMillis, RequestId, StrategyId};
use super::performance::{PerformanceSnapshot, ThroughputSummary};
use super::request::ChunkRequest;
use crate::errors::{ChunkSystemError, Result};

/// Which queue a request currently lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Active,
    Delayed,
}

/// The aggregate owned by the scheduling state machine
///
/// Values are never changed in place: `apply_command` builds a new state for
/// every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ChunkSystemStatePayload")]
pub struct ChunkSystemState {
    pub(crate) active: Vec<ChunkRequest>,
    pub(crate) delayed: Vec<ChunkRequest>,
    pub(crate) budget: ResourceBudget,
    pub(crate) strategy: StrategyId,
    pub(crate) performance: PerformanceSnapshot,
    pub(crate) tick: u64,
}

impl ChunkSystemState {
    /// Requests counted against the concurrency budget, in admission order
    pub fn active(&self) -> &[ChunkRequest] {
        &self.active
    }

    /// Requests that missed their deadline before admission
    pub fn delayed(&self) -> &[ChunkRequest] {
        &self.delayed
    }

    pub fn budget(&self) -> &ResourceBudget {
        &self.budget
    }

    pub fn strategy(&self) -> &StrategyId {
        &self.strategy
    }

    pub fn performance(&self) -> &PerformanceSnapshot {
        &self.performance
    }

    /// Number of committed transitions
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether another non-expired request can be admitted
    pub fn has_capacity(&self) -> bool {
        self.active.len() < self.budget.capacity()
    }

    /// Find a request by id, searching `active` before `delayed`
    pub fn find(&self, id: &RequestId) -> Option<(QueueKind, &ChunkRequest)> {
        self.active
            .iter()
            .find(|r| &r.id == id)
            .map(|r| (QueueKind::Active, r))
            .or_else(|| {
                self.delayed
                    .iter()
                    .find(|r| &r.id == id)
                    .map(|r| (QueueKind::Delayed, r))
            })
    }
}

/// Persisted shape of [`ChunkSystemState`], checked before it is accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkSystemStatePayload {
    pub active: Vec<ChunkRequest>,
    pub delayed: Vec<ChunkRequest>,
    pub budget: ResourceBudget,
    pub strategy: StrategyId,
    pub performance: PerformanceSnapshot,
    pub tick: u64,
}

impl TryFrom<ChunkSystemStatePayload> for ChunkSystemState {
    type Error = ChunkSystemError;

    fn try_from(payload: ChunkSystemStatePayload) -> Result<Self> {
        if payload.active.len() > payload.budget.capacity() {
            return Err(ChunkSystemError::validation(format!(
                "{} active requests exceed maxConcurrent={}",
                payload.active.len(),
                payload.budget.max_concurrent
            )));
        }
        if payload.tick == u64::MAX {
            return Err(ChunkSystemError::validation("tick counter exhausted"));
        }

        Ok(Self {
            active: payload.active,
            delayed: payload.delayed,
            budget: payload.budget,
            strategy: payload.strategy,
            performance: payload.performance,
            tick: payload.tick,
        })
    }
}

/// Build the state a brand-new instance starts from
///
/// Tick 0, both queues empty, throughput seeded at 0 ops/s and a success
/// ratio of 1.
pub fn make_initial_state(config: &SystemConfig, now: EpochMillis) -> ChunkSystemState {
    ChunkSystemState {
        active: Vec::new(),
        delayed: Vec::new(),
        budget: config.initial_budget.clone(),
        strategy: config.initial_strategy.clone(),
        performance: PerformanceSnapshot {
            captured_at: now,
            window: config.performance_window.clone(),
            throughput: ThroughputSummary::idle(),
        },
        tick: 0,
    }
}
