//! Field-level validation shared by every validated constructor
//!
//! These helpers are the only place malformed external values are turned
//! into `ValidationError`s. Anything past them operates on validated types.

use regex::Regex;
use std::sync::OnceLock;

use crate::errors::{ChunkSystemError, Result};

/// Pattern every chunk identifier must match
pub const CHUNK_ID_PATTERN: &str = r"^[a-z0-9\-_/]+$";

/// Maximum length of strategy and budget identifiers
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Maximum length of a failure reason
pub const MAX_REASON_LEN: usize = 256;

fn chunk_id_regex() -> &'static Regex {
    static CHUNK_ID: OnceLock<Regex> = OnceLock::new();
    CHUNK_ID.get_or_init(|| Regex::new(CHUNK_ID_PATTERN).expect("chunk id pattern is valid"))
}

/// Validate a chunk identifier against [`CHUNK_ID_PATTERN`]
///
/// # Errors
/// Returns `ValidationError` if the identifier is empty or contains a
/// character outside `[a-z0-9-_/]`.
pub fn validate_chunk_id(value: &str) -> Result<()> {
    if chunk_id_regex().is_match(value) {
        Ok(())
    } else {
        Err(ChunkSystemError::validation(format!(
            "chunk id '{}' must match {}",
            value, CHUNK_ID_PATTERN
        )))
    }
}

/// Validate a string's length (in characters) lies within `min..=max`
///
/// # Errors
/// Returns `ValidationError` naming `field` when the length is out of range.
pub fn validate_bounded(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ChunkSystemError::validation(format!(
            "{} must be between {} and {} characters, got {}",
            field, min, max, len
        )));
    }
    Ok(())
}

/// Validate a bounded identifier: 1..=64 chars without surrounding whitespace
///
/// # Errors
/// Returns `ValidationError` if the identifier is empty, too long, or padded.
pub fn validate_identifier(field: &str, value: &str) -> Result<()> {
    validate_bounded(field, value, 1, MAX_IDENTIFIER_LEN)?;
    if value.trim() != value {
        return Err(ChunkSystemError::validation(format!(
            "{} must not have leading or trailing whitespace",
            field
        )));
    }
    Ok(())
}

/// Validate an epoch-millisecond value is non-negative
///
/// # Errors
/// Returns `ValidationError` for negative input.
pub fn validate_epoch_millis(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        ChunkSystemError::validation(format!(
            "{} must be a non-negative epoch millisecond value, got {}",
            field, value
        ))
    })
}

/// Validate a floating-point quantity is finite and strictly positive
///
/// # Errors
/// Returns `ValidationError` for zero, negative, NaN or infinite input.
pub fn validate_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ChunkSystemError::validation(format!(
            "{} must be a finite value greater than 0, got {}",
            field, value
        )))
    }
}

/// Validate a floating-point quantity is finite and non-negative
///
/// # Errors
/// Returns `ValidationError` for negative, NaN or infinite input.
pub fn validate_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ChunkSystemError::validation(format!(
            "{} must be a finite value >= 0, got {}",
            field, value
        )))
    }
}

/// Validate a request's time window: `created_at <= deadline`
///
/// # Errors
/// Returns `ValidationError` when the deadline precedes creation.
pub fn validate_request_window(created_at: u64, deadline: u64) -> Result<()> {
    if created_at > deadline {
        return Err(ChunkSystemError::validation(format!(
            "createdAt ({}) must not be after deadline ({})",
            created_at, deadline
        )));
    }
    Ok(())
}
