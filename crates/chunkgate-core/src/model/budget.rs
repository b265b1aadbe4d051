use serde::{Deserialize, Serialize};

use super::ids::BudgetId;
use crate::errors::{ChunkSystemError, Result};
use crate::rules::validation;

/// Admission policy family a budget was sized for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStrategy {
    Strict,
    Adaptive,
    Burst,
}

impl BudgetStrategy {
    /// Parse the wire form (`strict`, `adaptive`, `burst`)
    ///
    /// # Errors
    /// Returns `ValidationError` for any other value.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "strict" => Ok(BudgetStrategy::Strict),
            "adaptive" => Ok(BudgetStrategy::Adaptive),
            "burst" => Ok(BudgetStrategy::Burst),
            other => Err(ChunkSystemError::validation(format!(
                "unknown budget strategy '{}' (expected strict, adaptive or burst)",
                other
            ))),
        }
    }
}

/// Admission ceiling for the active queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResourceBudgetPayload")]
pub struct ResourceBudget {
    pub id: BudgetId,
    pub strategy: BudgetStrategy,
    #[serde(rename = "maxConcurrent")]
    pub max_concurrent: u32,
    #[serde(rename = "maxMemoryMiB")]
    pub max_memory_mib: f64,
    #[serde(rename = "maxBandwidthMbps")]
    pub max_bandwidth_mbps: f64,
}

impl ResourceBudget {
    /// Build a budget from validated parts
    ///
    /// # Errors
    /// Returns `ValidationError` if `max_concurrent` is 0 or either limit is
    /// not strictly positive.
    pub fn new(
        id: BudgetId,
        strategy: BudgetStrategy,
        max_concurrent: u32,
        max_memory_mib: f64,
        max_bandwidth_mbps: f64,
    ) -> Result<Self> {
        if max_concurrent == 0 {
            return Err(ChunkSystemError::validation(
                "maxConcurrent must be at least 1",
            ));
        }
        validation::validate_positive("maxMemoryMiB", max_memory_mib)?;
        validation::validate_positive("maxBandwidthMbps", max_bandwidth_mbps)?;
        Ok(Self {
            id,
            strategy,
            max_concurrent,
            max_memory_mib,
            max_bandwidth_mbps,
        })
    }

    /// Number of requests the active queue may hold
    pub fn capacity(&self) -> usize {
        self.max_concurrent as usize
    }
}

/// Unvalidated wire shape of a [`ResourceBudget`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBudgetPayload {
    pub id: String,
    pub strategy: String,
    #[serde(rename = "maxConcurrent")]
    pub max_concurrent: i64,
    #[serde(rename = "maxMemoryMiB")]
    pub max_memory_mib: f64,
    #[serde(rename = "maxBandwidthMbps")]
    pub max_bandwidth_mbps: f64,
}

impl TryFrom<ResourceBudgetPayload> for ResourceBudget {
    type Error = ChunkSystemError;

    fn try_from(payload: ResourceBudgetPayload) -> Result<Self> {
        let max_concurrent = u32::try_from(payload.max_concurrent).map_err(|_| {
            ChunkSystemError::validation(format!(
                "maxConcurrent must be a positive integer, got {}",
                payload.max_concurrent
            ))
        })?;
        ResourceBudget::new(
            BudgetId::new(payload.id)?,
            BudgetStrategy::parse(&payload.strategy)?,
            max_concurrent,
            payload.max_memory_mib,
            payload.max_bandwidth_mbps,
        )
    }
}
