use serde::{Deserialize, Serialize};

use super::ids::EpochMillis;
use crate::errors::{ChunkSystemError, Result};
use crate::rules::validation;

/// Smoothed load figures over a fixed window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PerformanceWindowPayload")]
pub struct PerformanceWindow {
    #[serde(rename = "windowMs")]
    pub window_ms: u64,
    #[serde(rename = "rollingAverage")]
    pub rolling_average: f64,
    #[serde(rename = "percentile95")]
    pub percentile95: f64,
}

impl PerformanceWindow {
    /// Build a window from validated parts
    ///
    /// # Errors
    /// Returns `ValidationError` if `window_ms` is 0 or an average is negative
    /// or not finite.
    pub fn new(window_ms: u64, rolling_average: f64, percentile95: f64) -> Result<Self> {
        if window_ms == 0 {
            return Err(ChunkSystemError::validation(
                "windowMs must be at least 1",
            ));
        }
        validation::validate_non_negative("rollingAverage", rolling_average)?;
        validation::validate_non_negative("percentile95", percentile95)?;
        Ok(Self {
            window_ms,
            rolling_average,
            percentile95,
        })
    }

    /// Window length in seconds
    pub fn window_secs(&self) -> f64 {
        self.window_ms as f64 / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceWindowPayload {
    #[serde(rename = "windowMs")]
    pub window_ms: u64,
    #[serde(rename = "rollingAverage", default)]
    pub rolling_average: f64,
    #[serde(rename = "percentile95", default)]
    pub percentile95: f64,
}

impl TryFrom<PerformanceWindowPayload> for PerformanceWindow {
    type Error = ChunkSystemError;

    fn try_from(payload: PerformanceWindowPayload) -> Result<Self> {
        PerformanceWindow::new(
            payload.window_ms,
            payload.rolling_average,
            payload.percentile95,
        )
    }
}

/// Throughput derived from the current queue sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ThroughputSummaryPayload")]
pub struct ThroughputSummary {
    pub operations_per_second: f64,
    pub success_ratio: f64,
}

impl ThroughputSummary {
    /// # Errors
    /// Returns `ValidationError` if the rate is negative or not finite, or the
    /// ratio lies outside `[0, 1]`.
    pub fn new(operations_per_second: f64, success_ratio: f64) -> Result<Self> {
        validation::validate_non_negative("operationsPerSecond", operations_per_second)?;
        if !(0.0..=1.0).contains(&success_ratio) {
            return Err(ChunkSystemError::validation(format!(
                "successRatio must be within [0, 1], got {}",
                success_ratio
            )));
        }
        Ok(Self {
            operations_per_second,
            success_ratio,
        })
    }

    /// Summary of a system that has not processed anything yet
    pub fn idle() -> Self {
        Self {
            operations_per_second: 0.0,
            success_ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughputSummaryPayload {
    pub operations_per_second: f64,
    pub success_ratio: f64,
}

impl TryFrom<ThroughputSummaryPayload> for ThroughputSummary {
    type Error = ChunkSystemError;

    fn try_from(payload: ThroughputSummaryPayload) -> Result<Self> {
        ThroughputSummary::new(payload.operations_per_second, payload.success_ratio)
    }
}

/// Point-in-time performance figures, recomputed on every transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    pub captured_at: EpochMillis,
    pub window: PerformanceWindow,
    pub throughput: ThroughputSummary,
}
