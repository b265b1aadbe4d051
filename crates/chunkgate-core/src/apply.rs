//! Pure transition function
//!
//! This module provides `apply_command()`, the only place business rules of
//! the scheduler live.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: either a complete new state plus its events is
//!   returned, or a typed error and no new state at all
//! - **Copy-on-write**: the input state is borrowed, never changed
//! - **Monotonic tick**: every `Ok` has `tick = previous + 1`
//! - **No panics**: invalid operations return typed errors
//!
//! ## Example
//!
//! ```
//! use chunkgate_core::{apply_command, make_initial_state, Command, ManualClock, SystemConfig};
//! use chunkgate_core::model::{ChunkRequestPayload, ChunkRequest, EpochMillis};
//!
//! let config: SystemConfig = serde_json::from_str(
//!     r#"{
//!         "initialBudget": {"id": "default", "strategy": "strict", "maxConcurrent": 1,
//!                           "maxMemoryMiB": 256.0, "maxBandwidthMbps": 50.0},
//!         "initialStrategy": "strict",
//!         "performanceWindow": {"windowMs": 1000}
//!     }"#,
//! )
//! .unwrap();
//! let clock = ManualClock::new(EpochMillis::from_millis(0));
//! let state = make_initial_state(&config, EpochMillis::from_millis(0));
//!
//! let request = ChunkRequest::try_from(ChunkRequestPayload {
//!     id: "0b7e3a52-4a5b-4f7e-9c3d-2f1e0a9b8c7d".to_string(),
//!     chunk: "overworld/0_0".to_string(),
//!     priority: "high".to_string(),
//!     action: "load".to_string(),
//!     created_at: 0,
//!     deadline: 100,
//! })
//! .unwrap();
//!
//! let transition = apply_command(&state, Command::Schedule { request }, &clock).unwrap();
//! assert_eq!(transition.state.active().len(), 1);
//! assert_eq!(transition.state.tick(), 1);
//! assert_eq!(transition.events.len(), 1);
//! ```

use crate::clock::Clock;
use crate::commands::Command;
use crate::errors::{ChunkSystemError, Result};
use crate::events::ChunkEvent;
use crate::model::{
    ChunkRequest, ChunkSystemState, EpochMillis, FailureReason, Priority, QueueKind, RequestId,
    StrategyId,
};
use crate::ops::{performance, queue};

/// Outcome of a successful transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Brand-new state; the input state is untouched
    pub state: ChunkSystemState,
    /// Events in emission order (possibly empty)
    pub events: Vec<ChunkEvent>,
}

/// Apply a command to a state, returning the next state and its events
///
/// The clock is read once; the same instant decides expiry on `Schedule`
/// and stamps the recomputed performance snapshot.
///
/// # Errors
///
/// * `ResourceBudgetExceeded` - a non-expired `Schedule` while the active
///   queue is at `max_concurrent`
/// * `RequestNotFound` - `Complete`, `Fail` or `Reprioritize` for an id in
///   neither queue
///
/// On error the caller's state is still the valid current state.
pub fn apply_command(
    state: &ChunkSystemState,
    cmd: Command,
    clock: &dyn Clock,
) -> Result<Transition> {
    let now = clock.now();
    let command = cmd.name();

    let transition = match cmd {
        Command::Schedule { request } => schedule(state, request, now)?,

        Command::Complete {
            request_id,
            completed_at,
        } => complete(state, &request_id, completed_at, now)?,

        Command::Fail {
            request_id,
            occurred_at,
            reason,
        } => fail(state, &request_id, occurred_at, reason, now)?,

        Command::Reprioritize {
            request_id,
            new_priority,
        } => reprioritize(state, &request_id, new_priority, now)?,

        Command::SwitchStrategy {
            strategy,
            decided_at,
        } => switch_strategy(state, strategy, decided_at, now)?,
    };

    tracing::debug!(
        command,
        tick = transition.state.tick,
        active_len = transition.state.active.len() as u64,
        delayed_len = transition.state.delayed.len() as u64,
        event_count = transition.events.len() as u64,
        "Applied command"
    );

    Ok(transition)
}

/// Assemble the successor state: performance is recomputed against the
/// predecessor, tick advances by exactly one.
///
/// A predecessor at `u64::MAX` has no successor tick and is rejected.
fn successor(
    previous: &ChunkSystemState,
    active: Vec<ChunkRequest>,
    delayed: Vec<ChunkRequest>,
    strategy: StrategyId,
    delta_active: i64,
    now: EpochMillis,
) -> Result<ChunkSystemState> {
    let tick = previous
        .tick
        .checked_add(1)
        .ok_or_else(|| ChunkSystemError::validation("tick counter exhausted"))?;

    Ok(ChunkSystemState {
        active,
        delayed,
        budget: previous.budget.clone(),
        strategy,
        performance: performance::recompute(previous, delta_active, now),
        tick,
    })
}

fn schedule(
    state: &ChunkSystemState,
    request: ChunkRequest,
    now: EpochMillis,
) -> Result<Transition> {
    let expired = request.is_expired_at(now);

    let (active, delayed, delta) = if expired {
        // Already-missed work: recorded, never admitted, no capacity check
        let mut delayed = state.delayed.clone();
        delayed.push(request.clone());
        (state.active.clone(), delayed, 0)
    } else {
        if !state.has_capacity() {
            return Err(ChunkSystemError::ResourceBudgetExceeded {
                request: Box::new(request),
                budget: state.budget.clone(),
            });
        }
        let mut active = state.active.clone();
        active.push(request.clone());
        (active, state.delayed.clone(), 1)
    };

    Ok(Transition {
        state: successor(
            state,
            active,
            delayed,
            state.strategy.clone(),
            delta,
            now,
        )?,
        events: vec![ChunkEvent::RequestQueued { request }],
    })
}

fn complete(
    state: &ChunkSystemState,
    request_id: &RequestId,
    completed_at: EpochMillis,
    now: EpochMillis,
) -> Result<Transition> {
    let removed = queue::remove_request(state, request_id)?;
    let delta = removed.active_delta();

    Ok(Transition {
        state: successor(
            state,
            removed.active,
            removed.delayed,
            state.strategy.clone(),
            delta,
            now,
        )?,
        events: vec![ChunkEvent::RequestCompleted {
            request_id: request_id.clone(),
            completed_at,
        }],
    })
}

fn fail(
    state: &ChunkSystemState,
    request_id: &RequestId,
    occurred_at: EpochMillis,
    reason: FailureReason,
    now: EpochMillis,
) -> Result<Transition> {
    let removed = queue::remove_request(state, request_id)?;
    let delta = removed.active_delta();

    Ok(Transition {
        state: successor(
            state,
            removed.active,
            removed.delayed,
            state.strategy.clone(),
            delta,
            now,
        )?,
        events: vec![ChunkEvent::RequestFailed {
            request_id: request_id.clone(),
            occurred_at,
            reason,
        }],
    })
}

fn reprioritize(
    state: &ChunkSystemState,
    request_id: &RequestId,
    new_priority: Priority,
    now: EpochMillis,
) -> Result<Transition> {
    let removed = queue::remove_request(state, request_id)?;
    let updated = removed.request.with_priority(new_priority);

    // Same queue, re-inserted at the tail; admission status never changes
    let (mut active, mut delayed) = (removed.active, removed.delayed);
    match removed.queue {
        QueueKind::Active => active.push(updated.clone()),
        QueueKind::Delayed => delayed.push(updated.clone()),
    }

    Ok(Transition {
        state: successor(state, active, delayed, state.strategy.clone(), 0, now)?,
        events: vec![ChunkEvent::RequestQueued { request: updated }],
    })
}

fn switch_strategy(
    state: &ChunkSystemState,
    strategy: StrategyId,
    decided_at: EpochMillis,
    now: EpochMillis,
) -> Result<Transition> {
    let changed = state.strategy != strategy;
    let events = if changed {
        vec![ChunkEvent::StrategyShifted {
            strategy: strategy.clone(),
            decided_at,
        }]
    } else {
        Vec::new()
    };

    Ok(Transition {
        state: successor(
            state,
            state.active.clone(),
            state.delayed.clone(),
            strategy,
            0,
            now,
        )?,
        events,
    })
}
