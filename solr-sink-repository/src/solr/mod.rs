//! Solr implementation of the index client.
//!
//! This module provides a concrete implementation of `IndexClient`
//! using Solr's JSON update handler as the backend.

mod client;
mod protocol;

pub use client::SolrClient;
pub use protocol::ResponseHeader;
