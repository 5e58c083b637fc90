//! Error types for the Solr sink repository.

mod index_error;

pub use index_error::IndexError;
