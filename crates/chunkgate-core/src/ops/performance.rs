//! Rolling performance estimate
//!
//! Recomputed on every transition from the state *before* the transition,
//! offset by how the transition changes the active count.

use crate::model::{
    ChunkSystemState, EpochMillis, PerformanceSnapshot, PerformanceWindow, ThroughputSummary,
};

/// EMA weight of the newest sample in `rolling_average`
pub const ROLLING_AVERAGE_ALPHA: f64 = 0.2;

/// EMA weight of the newest sample in `percentile95`
///
/// A slower smoothed load proxy, not a statistical percentile.
pub const PERCENTILE_ALPHA: f64 = 0.1;

/// Recompute the performance snapshot
///
/// * `active_count = |active| + delta_active`
/// * `success_ratio = 1` when nothing is queued, else
///   `clamp(active_count / (active_count + |delayed|), 0, 1)`
/// * `operations_per_second = max(active_count, 0) / window_secs`
/// * `rolling_average` and `percentile95` are EMAs floored at 0
pub fn recompute(
    state: &ChunkSystemState,
    delta_active: i64,
    now: EpochMillis,
) -> PerformanceSnapshot {
    let previous = &state.performance.window;
    let active_count = state.active.len() as i64 + delta_active;
    let total = active_count + state.delayed.len() as i64;

    let success_ratio = if total == 0 {
        1.0
    } else {
        (active_count as f64 / total as f64).clamp(0.0, 1.0)
    };

    let sample = active_count as f64;
    let operations_per_second = active_count.max(0) as f64 / previous.window_secs();
    let rolling_average = (previous.rolling_average * (1.0 - ROLLING_AVERAGE_ALPHA)
        + sample * ROLLING_AVERAGE_ALPHA)
        .max(0.0);
    let percentile95 =
        (previous.percentile95 * (1.0 - PERCENTILE_ALPHA) + sample * PERCENTILE_ALPHA).max(0.0);

    PerformanceSnapshot {
        captured_at: now,
        window: PerformanceWindow {
            window_ms: previous.window_ms,
            rolling_average,
            percentile95,
        },
        throughput: ThroughputSummary {
            operations_per_second,
            success_ratio,
        },
    }
}
