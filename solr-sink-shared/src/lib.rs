//! # Solr Sink Shared
//!
//! Data types shared by the repository, pipeline and binary crates:
//! typed cell values, rows with their schema, field mappings and the
//! documents submitted to the index.

mod document;
mod mapping;
mod row;
mod value;

pub use document::Document;
pub use mapping::FieldMapping;
pub use row::{Row, RowError, RowSchema};
pub use value::Value;
