//! Index client error types.
//!
//! This module defines the errors that can occur while talking to the
//! remote index service.

use thiserror::Error;

/// Errors that can occur during index client operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The endpoint URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid endpoint URL {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The client configuration is unusable.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be built or is closed.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A document was rejected or not acknowledged.
    #[error("Unable to add document at {endpoint}: {reason}")]
    Submission {
        endpoint: String,
        status: Option<i32>,
        reason: String,
    },

    /// The remote side failed to commit.
    #[error("Unable to commit at {endpoint}: {reason}")]
    Commit {
        endpoint: String,
        status: Option<i32>,
        reason: String,
    },
}

impl IndexError {
    /// Create an invalid endpoint error.
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a submission error.
    pub fn submission(
        endpoint: impl Into<String>,
        status: Option<i32>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Submission {
            endpoint: endpoint.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a commit error.
    pub fn commit(
        endpoint: impl Into<String>,
        status: Option<i32>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Commit {
            endpoint: endpoint.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Remote status carried by a submission or commit failure, if any.
    pub fn status(&self) -> Option<i32> {
        match self {
            Self::Submission { status, .. } | Self::Commit { status, .. } => *status,
            _ => None,
        }
    }
}
