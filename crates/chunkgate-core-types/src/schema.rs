//! Canonical schema constants for structured logging
//!
//! These constants keep field names consistent across the state machine,
//! the repository backends and the orchestration service.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_CORRELATION_ID: &str = "correlation_id";

// Entity identifiers
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_CHUNK: &str = "chunk";
pub const FIELD_STRATEGY: &str = "strategy";

// State counters
pub const FIELD_TICK: &str = "tick";
pub const FIELD_ACTIVE_LEN: &str = "active_len";
pub const FIELD_DELAYED_LEN: &str = "delayed_len";
pub const FIELD_EVENT_COUNT: &str = "event_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
