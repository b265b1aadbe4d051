//! Branded primitives
//!
//! Each newtype can only be built through a validating constructor, and
//! deserialization goes through the same constructor via `try_from`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ChunkSystemError, Result};
use crate::rules::validation;

/// Non-negative epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct EpochMillis(u64);

impl EpochMillis {
    /// Validate an externally supplied (possibly negative) timestamp
    ///
    /// # Errors
    /// Returns `ValidationError` for negative values.
    pub fn new(ms: i64) -> Result<Self> {
        validation::validate_epoch_millis("epoch millis", ms).map(Self)
    }

    /// Wrap an already non-negative value
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for EpochMillis {
    type Error = ChunkSystemError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<EpochMillis> for u64 {
    fn from(value: EpochMillis) -> Self {
        value.0
    }
}

impl std::fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident, $validate:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap the given value
            ///
            /// # Errors
            /// Returns `ValidationError` if the value is malformed.
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                let validate: fn(&str) -> Result<()> = $validate;
                validate(&value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ChunkSystemError;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(
    /// Chunk identifier matching `^[a-z0-9\-_/]+$`
    ChunkId,
    validation::validate_chunk_id
);

string_newtype!(
    /// Opaque identifier of the admission strategy currently in effect
    StrategyId,
    |value| validation::validate_identifier("strategy id", value)
);

string_newtype!(
    /// Resource budget identifier
    BudgetId,
    |value| validation::validate_identifier("budget id", value)
);

string_newtype!(
    /// Human-readable failure reason, 1..=256 characters
    FailureReason,
    |value| validation::validate_bounded("reason", value, 1, validation::MAX_REASON_LEN)
);

/// Request identifier (UUID, stored in canonical hyphenated lowercase form)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(String);

impl RequestId {
    /// Parse a UUID in any form the `uuid` crate accepts
    ///
    /// # Errors
    /// Returns `ValidationError` if the value is not a UUID.
    pub fn new(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref();
        let uuid = Uuid::parse_str(value).map_err(|e| {
            ChunkSystemError::validation(format!("request id '{}' is not a UUID: {}", value, e))
        })?;
        Ok(Self::from_uuid(uuid))
    }

    /// Generate a fresh random request id
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RequestId {
    type Error = ChunkSystemError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RequestId> for String {
    fn from(value: RequestId) -> Self {
        value.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
