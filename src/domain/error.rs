use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the memoization layer itself
///
/// Failures of a wrapped operation are never converted into this type; they
/// are stored and replayed as the operation's own error value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MemoError {
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error(
        "Invalid TTL: {seconds}s (must be between 1 and {max}s)",
        max = crate::domain::memo::Ttl::MAX_SECS
    )]
    InvalidTtl { seconds: i64 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl MemoError {
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn invalid_ttl(seconds: i64) -> Self {
        Self::InvalidTtl { seconds }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for MemoError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
