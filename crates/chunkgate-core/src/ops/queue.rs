//! Queue helpers used by the transition function
//!
//! All helpers build new vectors; the input state is left untouched.

use crate::errors::{ChunkSystemError, Result};
use crate::model::{ChunkRequest, ChunkSystemState, QueueKind, RequestId};

/// Result of removing a request from whichever queue held it
#[derive(Debug, Clone)]
pub struct Removed {
    pub queue: QueueKind,
    pub request: ChunkRequest,
    pub active: Vec<ChunkRequest>,
    pub delayed: Vec<ChunkRequest>,
}

impl Removed {
    /// Change in active count caused by the removal
    pub fn active_delta(&self) -> i64 {
        match self.queue {
            QueueKind::Active => -1,
            QueueKind::Delayed => 0,
        }
    }
}

// Drops the first match only, the same entry `find` located
fn without(queue: &[ChunkRequest], id: &RequestId) -> Vec<ChunkRequest> {
    let mut remaining = queue.to_vec();
    if let Some(pos) = remaining.iter().position(|r| &r.id == id) {
        remaining.remove(pos);
    }
    remaining
}

/// Remove a request, searching `active` first, then `delayed`
///
/// # Errors
/// Returns `RequestNotFound` if neither queue holds the id.
pub fn remove_request(state: &ChunkSystemState, id: &RequestId) -> Result<Removed> {
    let (queue, request) = state
        .find(id)
        .map(|(queue, request)| (queue, request.clone()))
        .ok_or_else(|| ChunkSystemError::RequestNotFound {
            id: id.to_string(),
        })?;

    let (active, delayed) = match queue {
        QueueKind::Active => (without(&state.active, id), state.delayed.clone()),
        QueueKind::Delayed => (state.active.clone(), without(&state.delayed, id)),
    };

    Ok(Removed {
        queue,
        request,
        active,
        delayed,
    })
}
