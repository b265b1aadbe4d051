//! Structured logging facility for chunkgate
//!
//! This module provides a canonical logging facility with:
//! - Single initialization point via `init(profile)`
//! - Structured lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Ownership
//!
//! The orchestration layer owns lifecycle logging for a dispatch. The state
//! machine and the repository backends only emit `tracing::debug!` details.
//!
//! # Usage
//!
//! ```rust
//! use chunkgate_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
