//! Events emitted by the state machine
//!
//! Events are what repositories persist alongside the state and broadcast
//! to subscribers. The wire form is internally tagged by `"type"`.

use serde::{Deserialize, Serialize};

use crate::model::{ChunkRequest, EpochMillis, FailureReason, RequestId, StrategyId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChunkEvent {
    /// A request entered a queue (initial schedule or reprioritization)
    RequestQueued { request: ChunkRequest },

    #[serde(rename_all = "camelCase")]
    RequestCompleted {
        request_id: RequestId,
        completed_at: EpochMillis,
    },

    #[serde(rename_all = "camelCase")]
    RequestFailed {
        request_id: RequestId,
        occurred_at: EpochMillis,
        reason: FailureReason,
    },

    #[serde(rename_all = "camelCase")]
    StrategyShifted {
        strategy: StrategyId,
        decided_at: EpochMillis,
    },
}

impl ChunkEvent {
    /// Stable name used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            ChunkEvent::RequestQueued { .. } => "RequestQueued",
            ChunkEvent::RequestCompleted { .. } => "RequestCompleted",
            ChunkEvent::RequestFailed { .. } => "RequestFailed",
            ChunkEvent::StrategyShifted { .. } => "StrategyShifted",
        }
    }
}
