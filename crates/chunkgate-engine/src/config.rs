//! Startup configuration
//!
//! Read once from TOML. Every value is pushed through the same validating
//! constructors the domain uses, so a bad file fails with `ValidationError`
//! before the service starts.
//!
//! ```toml
//! initial_strategy = "strict"
//!
//! [initial_budget]
//! id = "default"
//! strategy = "strict"
//! max_concurrent = 8
//! max_memory_mib = 512.0
//! max_bandwidth_mbps = 100.0
//!
//! [performance_window]
//! window_ms = 1000
//!
//! [store]
//! event_capacity = 256
//! save_latency_ms = 2
//! data_dir = "/var/lib/chunkgate"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chunkgate_core::errors::{ChunkSystemError, Result};
use chunkgate_core::model::{
    BudgetId, BudgetStrategy, PerformanceWindow, ResourceBudget, StrategyId, SystemConfig,
};
use chunkgate_store::{
    ChunkRepository, FileRepository, InMemoryRepository, LatencyRepository,
    DEFAULT_EVENT_CAPACITY,
};
use serde::Deserialize;

/// Default simulated commit delay in milliseconds
pub const DEFAULT_SAVE_LATENCY_MS: u64 = 2;

/// Backend tuning
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    /// Events buffered per subscriber before the oldest are dropped
    pub event_capacity: usize,
    /// Commit delay; 0 disables the latency decorator, other values are
    /// raised to the 2 ms minimum
    pub save_latency_ms: u64,
    /// Directory for the state document; in-memory when absent
    pub data_dir: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            save_latency_ms: DEFAULT_SAVE_LATENCY_MS,
            data_dir: None,
        }
    }
}

impl StoreSettings {
    pub fn save_latency(&self) -> Duration {
        Duration::from_millis(self.save_latency_ms)
    }

    /// Build the repository these settings describe
    pub fn open_repository(&self) -> Arc<dyn ChunkRepository> {
        let latency = self.save_latency();
        match (&self.data_dir, self.save_latency_ms) {
            (Some(dir), 0) => Arc::new(FileRepository::with_capacity(dir, self.event_capacity)),
            (Some(dir), _) => Arc::new(LatencyRepository::new(
                FileRepository::with_capacity(dir, self.event_capacity),
                latency,
            )),
            (None, 0) => Arc::new(InMemoryRepository::with_capacity(self.event_capacity)),
            (None, _) => Arc::new(LatencyRepository::new(
                InMemoryRepository::with_capacity(self.event_capacity),
                latency,
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BudgetToml {
    id: String,
    strategy: String,
    max_concurrent: i64,
    max_memory_mib: f64,
    max_bandwidth_mbps: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowToml {
    window_ms: i64,
    #[serde(default)]
    rolling_average: f64,
    #[serde(default)]
    percentile95: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EngineToml {
    initial_strategy: String,
    initial_budget: BudgetToml,
    performance_window: WindowToml,
    #[serde(default)]
    store: StoreSettings,
}

fn positive_u32(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| {
            ChunkSystemError::validation(format!("{} must be a positive integer, got {}", field, value))
        })
}

fn positive_u64(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| {
            ChunkSystemError::validation(format!("{} must be a positive integer, got {}", field, value))
        })
}

impl TryFrom<EngineToml> for EngineConfig {
    type Error = ChunkSystemError;

    fn try_from(raw: EngineToml) -> Result<Self> {
        let budget = ResourceBudget::new(
            BudgetId::new(raw.initial_budget.id)?,
            BudgetStrategy::parse(&raw.initial_budget.strategy)?,
            positive_u32("max_concurrent", raw.initial_budget.max_concurrent)?,
            raw.initial_budget.max_memory_mib,
            raw.initial_budget.max_bandwidth_mbps,
        )?;

        let window = PerformanceWindow::new(
            positive_u64("window_ms", raw.performance_window.window_ms)?,
            raw.performance_window.rolling_average,
            raw.performance_window.percentile95,
        )?;

        Ok(EngineConfig {
            system: SystemConfig {
                initial_budget: budget,
                initial_strategy: StrategyId::new(raw.initial_strategy)?,
                performance_window: window,
            },
            store: raw.store,
        })
    }
}

/// Everything the service needs at startup
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub system: SystemConfig,
    pub store: StoreSettings,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns `ValidationError` for TOML syntax errors, missing or unknown
    /// keys, and values rejected by the domain constructors.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: EngineToml = toml::from_str(text)
            .map_err(|e| ChunkSystemError::validation(format!("invalid configuration: {}", e)))?;
        EngineConfig::try_from(raw)
    }

    /// Read and validate a TOML file
    ///
    /// # Errors
    /// Returns `ValidationError` if the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChunkSystemError::validation(format!(
                "cannot read configuration {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }
}
