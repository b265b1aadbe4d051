//! Decoding of externally supplied command payloads
//!
//! This is the validation boundary: JSON is parsed into unvalidated payload
//! structs, then every field is pushed through its validating constructor.
//! Any failure becomes `ValidationError` and the state machine never sees it.

use serde::Deserialize;

use crate::commands::Command;
use crate::errors::{ChunkSystemError, Result};
use crate::model::{
    ChunkRequest, ChunkRequestPayload, EpochMillis, FailureReason, Priority, RequestId,
    StrategyId,
};
use crate::rules::validation;

/// Unvalidated wire shape of a [`Command`], tagged by `"type"`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum CommandPayload {
    Schedule {
        request: ChunkRequestPayload,
    },

    #[serde(rename_all = "camelCase")]
    Complete {
        request_id: String,
        completed_at: i64,
    },

    #[serde(rename_all = "camelCase")]
    Fail {
        request_id: String,
        occurred_at: i64,
        reason: String,
    },

    #[serde(rename_all = "camelCase")]
    Reprioritize {
        request_id: String,
        new_priority: String,
    },

    #[serde(rename_all = "camelCase")]
    SwitchStrategy { strategy: String, decided_at: i64 },
}

fn epoch(field: &str, value: i64) -> Result<EpochMillis> {
    validation::validate_epoch_millis(field, value).map(EpochMillis::from_millis)
}

impl TryFrom<CommandPayload> for Command {
    type Error = ChunkSystemError;

    fn try_from(payload: CommandPayload) -> Result<Self> {
        match payload {
            CommandPayload::Schedule { request } => Ok(Command::Schedule {
                request: ChunkRequest::try_from(request)?,
            }),

            CommandPayload::Complete {
                request_id,
                completed_at,
            } => Ok(Command::Complete {
                request_id: RequestId::new(&request_id)?,
                completed_at: epoch("completedAt", completed_at)?,
            }),

            CommandPayload::Fail {
                request_id,
                occurred_at,
                reason,
            } => Ok(Command::Fail {
                request_id: RequestId::new(&request_id)?,
                occurred_at: epoch("occurredAt", occurred_at)?,
                reason: FailureReason::new(reason)?,
            }),

            CommandPayload::Reprioritize {
                request_id,
                new_priority,
            } => Ok(Command::Reprioritize {
                request_id: RequestId::new(&request_id)?,
                new_priority: Priority::parse(&new_priority)?,
            }),

            CommandPayload::SwitchStrategy {
                strategy,
                decided_at,
            } => Ok(Command::SwitchStrategy {
                strategy: StrategyId::new(strategy)?,
                decided_at: epoch("decidedAt", decided_at)?,
            }),
        }
    }
}

/// Decode a JSON command payload into a validated [`Command`]
///
/// # Errors
/// Returns `ValidationError` for malformed JSON, an unknown `type` tag,
/// missing fields, or any field failing validation.
pub fn decode_command(json: &str) -> Result<Command> {
    let payload: CommandPayload = serde_json::from_str(json)
        .map_err(|e| ChunkSystemError::validation(format!("malformed command payload: {}", e)))?;
    Command::try_from(payload)
}

/// Decode an already-parsed JSON value into a validated [`Command`]
///
/// # Errors
/// Same as [`decode_command`].
pub fn command_from_value(value: serde_json::Value) -> Result<Command> {
    let payload: CommandPayload = serde_json::from_value(value)
        .map_err(|e| ChunkSystemError::validation(format!("malformed command payload: {}", e)))?;
    Command::try_from(payload)
}
