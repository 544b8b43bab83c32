//! Error types for the producer workflow

use crate::client::StreamClientError;
use std::time::Duration;
use thiserror::Error;

/// Main error type for producer operations
///
/// Every terminal outcome of a workflow surfaces here; nothing is retried
/// past these variants and nothing is silently discarded.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// The stream appeared between our listing and our create call.
    /// Deliberately fatal: another provisioner owns the stream and we
    /// refuse to publish into it.
    #[error("Stream {0} already exists, aborting instead of publishing into it")]
    StreamConflict(String),

    #[error("Stream {0} did not become active within {1:?}")]
    ReadinessTimeout(String, Duration),

    #[error("Publish exhausted after {attempts} attempts: {last_error}")]
    PublishExhausted {
        attempts: u32,
        #[source]
        last_error: StreamClientError,
    },

    #[error("Stream service error: {0}")]
    Service(#[from] StreamClientError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Shutdown requested")]
    Shutdown,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for producer operations
pub type Result<T> = std::result::Result<T, ProducerError>;
