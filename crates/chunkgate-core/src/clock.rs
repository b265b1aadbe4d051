//! Clock collaborator
//!
//! The state machine reads wall-clock time once per transition, to decide
//! expiry on `Schedule` and to stamp the performance snapshot. It is passed
//! into `apply_command` so transitions can be replayed at a fixed time.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::model::EpochMillis;

/// Source of the current epoch-millisecond time
pub trait Clock: Send + Sync {
    /// Current time in epoch milliseconds
    fn now(&self) -> EpochMillis;
}

/// Wall clock backed by `chrono::Utc`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> EpochMillis {
        // Pre-1970 system clocks clamp to the epoch
        let ms = chrono::Utc::now().timestamp_millis().max(0);
        EpochMillis::from_millis(ms as u64)
    }
}

/// Settable clock for tests and deterministic replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start: EpochMillis) -> Self {
        Self {
            now_ms: AtomicU64::new(start.as_millis()),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now: EpochMillis) {
        self.now_ms.store(now.as_millis(), Ordering::SeqCst);
    }

    /// Move forward by `ms` milliseconds
    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> EpochMillis {
        EpochMillis::from_millis(self.now_ms.load(Ordering::SeqCst))
    }
}
