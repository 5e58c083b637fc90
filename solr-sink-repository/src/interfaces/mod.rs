//! Interface definitions for the index client.
//!
//! This module defines the abstract `IndexClient` trait that allows the
//! pipeline to run against Solr or a test double.

mod index_client;

pub use index_client::IndexClient;
