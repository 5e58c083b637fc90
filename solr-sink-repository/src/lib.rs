//! # Solr Sink Repository
//!
//! This crate provides the trait for talking to the remote index service
//! and a concrete implementation for Solr's JSON update API. It includes
//! the client configuration and the error type surfaced to the pipeline.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod solr;

pub use config::ClientConfig;
pub use errors::IndexError;
pub use interfaces::IndexClient;
pub use solr::SolrClient;
