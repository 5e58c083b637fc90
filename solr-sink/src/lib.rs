//! # Solr Sink
//!
//! Main library for the Solr row sink.
//!
//! This crate provides configuration, input/output adapters and the
//! dependency wiring for running the sink as a standalone process that
//! reads CSV rows and writes the forwarded rows as JSON lines.

pub mod config;
pub mod input;
pub mod output;

pub use config::{AppConfig, Dependencies};

use thiserror::Error;

/// Errors that can occur during sink initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Sink error.
    #[error("Sink error: {0}")]
    SinkError(#[from] solr_sink_pipeline::SinkError),

    /// CSV input error.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A background task panicked or was cancelled.
    #[error("Task error: {0}")]
    TaskError(String),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
