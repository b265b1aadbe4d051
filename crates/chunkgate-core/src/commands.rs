//! Command vocabulary of the scheduling state machine
//!
//! Commands only ever carry validated values. External payloads are turned
//! into commands by [`crate::decode`].

use crate::model::{ChunkRequest, EpochMillis, FailureReason, Priority, RequestId, StrategyId};

/// The five inputs accepted by `apply_command()`
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Admit a request to the active queue, or record it as delayed if its
    /// deadline has already passed
    Schedule { request: ChunkRequest },

    /// Remove a finished request
    Complete {
        request_id: RequestId,
        completed_at: EpochMillis,
    },

    /// Remove a request that could not be served
    Fail {
        request_id: RequestId,
        occurred_at: EpochMillis,
        reason: FailureReason,
    },

    /// Change a request's priority, moving it to the tail of its queue
    Reprioritize {
        request_id: RequestId,
        new_priority: Priority,
    },

    /// Switch the admission strategy in effect
    SwitchStrategy {
        strategy: StrategyId,
        decided_at: EpochMillis,
    },
}

impl Command {
    /// Stable name used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            Command::Schedule { .. } => "Schedule",
            Command::Complete { .. } => "Complete",
            Command::Fail { .. } => "Fail",
            Command::Reprioritize { .. } => "Reprioritize",
            Command::SwitchStrategy { .. } => "SwitchStrategy",
        }
    }

    /// Request the command targets, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Command::Schedule { request } => Some(&request.id),
            Command::Complete { request_id, .. }
            | Command::Fail { request_id, .. }
            | Command::Reprioritize { request_id, .. } => Some(request_id),
            Command::SwitchStrategy { .. } => None,
        }
    }
}
