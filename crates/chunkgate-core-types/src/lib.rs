//! Core types shared across chunkgate facilities
//!
//! This crate provides foundational types used by the error, logging and
//! orchestration layers:
//!
//! - **Correlation types**: CorrelationId for tagging a single dispatch
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::CorrelationId;
