//! Error types for the Solr sink pipeline.

use solr_sink_repository::IndexError;
use thiserror::Error;

/// Errors that can occur in the row sink.
///
/// Every variant is fatal to the stage: the controller stops the pipeline
/// as soon as one is raised.
#[derive(Error, Debug, Clone)]
pub enum SinkError {
    /// The index endpoint could not be used; the sink never runs.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(IndexError),

    /// A configured source field is missing from the input row.
    #[error("Could not find field [{field}] in the input row")]
    FieldNotFound { field: String },

    /// The index rejected or did not acknowledge a document.
    #[error("Submission error: {0}")]
    Submission(IndexError),

    /// The index failed to commit.
    #[error("Commit error: {0}")]
    Commit(IndexError),

    /// Invalid sink configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The controller was driven from the wrong state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The upstream row source failed.
    #[error("Source error: {0}")]
    SourceError(String),

    /// The downstream consumer refused a row.
    #[error("Downstream error: {0}")]
    DownstreamError(String),

    /// Channel communication error.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl SinkError {
    /// Create a field not found error.
    pub fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an invalid state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a downstream error.
    pub fn downstream(msg: impl Into<String>) -> Self {
        Self::DownstreamError(msg.into())
    }

    /// Create a channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::ChannelError(msg.into())
    }

    /// Classify an error raised while building the index client.
    pub fn from_init(err: IndexError) -> Self {
        match err {
            IndexError::InvalidEndpoint { .. } => Self::InvalidEndpoint(err),
            other => Self::ConfigError(other.to_string()),
        }
    }
}
