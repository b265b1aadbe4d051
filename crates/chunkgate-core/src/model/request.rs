use serde::{Deserialize, Serialize};

use super::ids::{ChunkId, EpochMillis, RequestId};
use crate::errors::{ChunkSystemError, Result};
use crate::rules::validation;

/// Scheduling priority of a chunk request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Normal,
    Low,
}

impl Priority {
    /// Parse the wire form (`critical`, `high`, `normal`, `low`)
    ///
    /// # Errors
    /// Returns `ValidationError` for any other value.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            other => Err(ChunkSystemError::validation(format!(
                "unknown priority '{}' (expected critical, high, normal or low)",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

/// What the external loader should do with the chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkAction {
    Load,
    Warmup,
    Unload,
}

impl ChunkAction {
    /// Parse the wire form (`load`, `warmup`, `unload`)
    ///
    /// # Errors
    /// Returns `ValidationError` for any other value.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "load" => Ok(ChunkAction::Load),
            "warmup" => Ok(ChunkAction::Warmup),
            "unload" => Ok(ChunkAction::Unload),
            other => Err(ChunkSystemError::validation(format!(
                "unknown action '{}' (expected load, warmup or unload)",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkAction::Load => "load",
            ChunkAction::Warmup => "warmup",
            ChunkAction::Unload => "unload",
        }
    }
}

/// A request to load, warm or unload one chunk
///
/// Immutable once built; `created_at <= deadline` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ChunkRequestPayload")]
pub struct ChunkRequest {
    pub id: RequestId,
    pub chunk: ChunkId,
    pub priority: Priority,
    pub action: ChunkAction,
    pub created_at: EpochMillis,
    pub deadline: EpochMillis,
}

impl ChunkRequest {
    /// Build a request from validated parts
    ///
    /// # Errors
    /// Returns `ValidationError` if `created_at > deadline`.
    pub fn new(
        id: RequestId,
        chunk: ChunkId,
        priority: Priority,
        action: ChunkAction,
        created_at: EpochMillis,
        deadline: EpochMillis,
    ) -> Result<Self> {
        validation::validate_request_window(created_at.as_millis(), deadline.as_millis())?;
        Ok(Self {
            id,
            chunk,
            priority,
            action,
            created_at,
            deadline,
        })
    }

    /// Same request with a different priority
    pub fn with_priority(&self, priority: Priority) -> Self {
        Self {
            priority,
            ..self.clone()
        }
    }

    /// Whether the deadline has already passed at `now`
    pub fn is_expired_at(&self, now: EpochMillis) -> bool {
        self.deadline < now
    }
}

/// Unvalidated wire shape of a [`ChunkRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRequestPayload {
    pub id: String,
    pub chunk: String,
    pub priority: String,
    pub action: String,
    pub created_at: i64,
    pub deadline: i64,
}

impl TryFrom<ChunkRequestPayload> for ChunkRequest {
    type Error = ChunkSystemError;

    fn try_from(payload: ChunkRequestPayload) -> Result<Self> {
        let created_at = validation::validate_epoch_millis("createdAt", payload.created_at)?;
        let deadline = validation::validate_epoch_millis("deadline", payload.deadline)?;
        ChunkRequest::new(
            RequestId::new(&payload.id)?,
            ChunkId::new(payload.chunk)?,
            Priority::parse(&payload.priority)?,
            ChunkAction::parse(&payload.action)?,
            EpochMillis::from_millis(created_at),
            EpochMillis::from_millis(deadline),
        )
    }
}
