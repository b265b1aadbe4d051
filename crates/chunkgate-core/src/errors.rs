use chunkgate_core_types::CorrelationId;
use thiserror::Error;

use crate::model::{ChunkRequest, ResourceBudget};

/// Result type alias using ChunkSystemError
pub type Result<T> = std::result::Result<T, ChunkSystemError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers, log pipelines and
/// tests can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Admission
    ResourceBudgetExceeded,

    // Lookup
    NotFound,

    // State machine
    InvalidTransition,

    // Decode boundary
    InvalidInput,

    // Integration/IO
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ResourceBudgetExceeded => "ERR_RESOURCE_BUDGET_EXCEEDED",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidTransition => "ERR_INVALID_TRANSITION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Structured counterpart of [`ChunkSystemError`] with classification fields
/// for programmatic handling and context for log lines.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    correlation_id: Option<CorrelationId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            correlation_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (request id, budget id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add correlation ID context
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the correlation ID context, if any
    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(correlation_id) = &self.correlation_id {
            write!(f, " (correlation_id: {})", correlation_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for the chunk scheduling core
///
/// Every failure is returned as one of these values; nothing is swallowed and
/// nothing panics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChunkSystemError {
    /// Admission denied: the active set is at `max_concurrent`
    #[error(
        "Resource budget {} exceeded: cannot admit request {} (max_concurrent={})",
        .budget.id,
        .request.id,
        .budget.max_concurrent
    )]
    ResourceBudgetExceeded {
        request: Box<ChunkRequest>,
        budget: ResourceBudget,
    },

    /// Request id is in neither the active nor the delayed queue
    #[error("Request not found: {id}")]
    RequestNotFound { id: String },

    /// Backend I/O failure, underlying cause flattened to a string
    #[error("Repository failure: {reason}")]
    RepositoryFailure { reason: String },

    /// Reserved: no transition currently raises it
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Malformed command, request or configuration payload
    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl ChunkSystemError {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ChunkSystemError::ValidationError {
            message: message.into(),
        }
    }

    /// Shorthand for a repository failure
    pub fn repository(reason: impl Into<String>) -> Self {
        ChunkSystemError::RepositoryFailure {
            reason: reason.into(),
        }
    }
}

impl From<ChunkSystemError> for ExError {
    fn from(err: ChunkSystemError) -> Self {
        match err {
            ChunkSystemError::ResourceBudgetExceeded { request, budget } => {
                ExError::new(ExErrorKind::ResourceBudgetExceeded)
                    .with_op("schedule")
                    .with_entity_id(request.id.as_str())
                    .with_message(format!(
                        "Budget {} is full (max_concurrent={})",
                        budget.id, budget.max_concurrent
                    ))
            }

            ChunkSystemError::RequestNotFound { id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(id)
                .with_message("Request not found in active or delayed queue"),

            ChunkSystemError::RepositoryFailure { reason } => {
                ExError::new(ExErrorKind::Persistence).with_message(reason)
            }

            ChunkSystemError::InvalidTransition { from, to } => {
                ExError::new(ExErrorKind::InvalidTransition)
                    .with_message(format!("Invalid transition from {} to {}", from, to))
            }

            ChunkSystemError::ValidationError { message } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}
