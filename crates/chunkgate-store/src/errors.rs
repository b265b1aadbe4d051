//! Error helpers for chunkgate-store
//!
//! Storage failures are flattened into `ChunkSystemError::RepositoryFailure`
//! with the failing operation prefixed to the reason.

use std::path::Path;

use chunkgate_core::errors::ChunkSystemError;

pub use chunkgate_core::errors::Result;

/// Nothing has been persisted yet
pub fn missing_state(backend: &str) -> ChunkSystemError {
    ChunkSystemError::repository(format!("{}: no persisted state", backend))
}

/// Filesystem error during `operation`
pub fn io_failure(operation: &str, path: &Path, err: std::io::Error) -> ChunkSystemError {
    ChunkSystemError::repository(format!("{} {}: {}", operation, path.display(), err))
}

/// State document could not be encoded or decoded
pub fn serialization_failure(operation: &str, err: serde_json::Error) -> ChunkSystemError {
    ChunkSystemError::repository(format!("{}: {}", operation, err))
}

/// Blocking task panicked or was cancelled
pub fn task_failure(operation: &str, err: tokio::task::JoinError) -> ChunkSystemError {
    ChunkSystemError::repository(format!("{}: background task failed: {}", operation, err))
}
