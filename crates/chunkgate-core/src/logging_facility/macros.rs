//! Canonical logging macros
//!
//! Every lifecycle line carries `component`, `op` and `event` so log
//! pipelines can pair a dispatch's start with its end. The macros resolve
//! `tracing` and the schema constants through this crate, so callers only
//! need `chunkgate-core` in scope.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_line {
    ($level:expr, $op:expr, $event:expr; $($field:tt)*) => {
        $crate::__tracing::event!(
            $level,
            component = module_path!(),
            op = $op,
            event = $event,
            $($field)*
        )
    };
}

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use chunkgate_core::log_op_start;
/// log_op_start!("service_start");
/// log_op_start!("dispatch", command = "Schedule", chunk = "overworld/0_0");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_line!(
            $crate::__tracing::Level::INFO,
            $op,
            $crate::__core_types::schema::EVENT_START;
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// `duration_ms` is mandatory; queue counters and the committed tick are the
/// usual extras.
///
/// # Example
///
/// ```
/// # use chunkgate_core::log_op_end;
/// log_op_end!("dispatch", duration_ms = 3u64);
/// log_op_end!("dispatch", duration_ms = 3u64, tick = 12u64, active_len = 4u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_line!(
            $crate::__tracing::Level::INFO,
            $op,
            $crate::__core_types::schema::EVENT_END;
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log an operation error
///
/// Accepts a `ChunkSystemError` or a ready `ExError`. The line carries the
/// stable `err.code`, and the correlation id when the error has one.
///
/// # Example
///
/// ```
/// # use chunkgate_core::log_op_error;
/// # use chunkgate_core::errors::{ChunkSystemError, ExError};
/// # use chunkgate_core_types::CorrelationId;
/// let err = ChunkSystemError::RequestNotFound { id: "0b7e3a52".to_string() };
/// log_op_error!("dispatch", err.clone(), duration_ms = 1u64);
///
/// let tagged = ExError::from(err).with_correlation_id(CorrelationId::new());
/// log_op_error!("dispatch", tagged, duration_ms = 1u64, command = "Complete");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        let correlation_id = ex_err.correlation_id().map(ToString::to_string);
        $crate::__log_op_line!(
            $crate::__tracing::Level::ERROR,
            $op,
            $crate::__core_types::schema::EVENT_END_ERROR;
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            correlation_id = correlation_id.as_deref(),
            $($($field)*)?
        );
    }};
}
