//! Error types for the repository filesystem view.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by the repository manager for a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} ({status} {code})")]
pub struct RemoteError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// 403 responses are never retried.
    pub fn is_fatal(&self) -> bool {
        self.status == 403
    }
}

/// Errors surfaced by the listing core and its collaborators
#[derive(Debug, Error)]
pub enum NexusError {
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NexusError {
    /// Whether a retry layer may re-issue the failed call.
    pub fn is_retryable(&self) -> bool {
        match self {
            NexusError::Remote(err) => !err.is_fatal(),
            NexusError::Transport(_) => true,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, NexusError::NotFound(_))
    }
}

impl From<config::ConfigError> for NexusError {
    fn from(err: config::ConfigError) -> Self {
        NexusError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for NexusError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NexusError::Decode(err.to_string())
        } else {
            NexusError::Transport(err.to_string())
        }
    }
}
