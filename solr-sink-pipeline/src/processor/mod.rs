//! Processor module for the Solr sink pipeline.
//!
//! Turns rows into documents: field positions are resolved once, then
//! every row is mapped with them.

mod document_mapper;
mod field_resolver;

pub use document_mapper::DocumentMapper;
pub use field_resolver::{FieldResolver, ResolvedIndices};
