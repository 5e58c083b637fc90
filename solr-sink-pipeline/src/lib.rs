//! # Solr Sink Pipeline
//!
//! This crate provides the row sink stage that turns pipeline rows into
//! Solr documents.
//!
//! ## Architecture
//!
//! Each row flows through the following components:
//!
//! 1. **Field Resolver**: Resolves configured source fields against the first row's schema
//! 2. **Document Mapper**: Builds one document per row from the resolved positions
//! 3. **Batch Committer**: Commits every `batch_size` submitted documents
//! 4. **Controller**: Drives the per-row flow, forwards rows and stops the pipeline on failure
//!
//! The surrounding pipeline engine is reached only through the traits in
//! [`collaborators`].

pub mod collaborators;
pub mod config;
pub mod controller;
pub mod errors;
pub mod loader;
pub mod processor;

pub use collaborators::{PipelineControl, RowSink, RowSource};
pub use config::SinkConfig;
pub use controller::{RowOutcome, RowSinkController, SinkState, SinkSummary};
pub use errors::SinkError;
