//! Field resolver implementation.
//!
//! Resolves configured source field names to positions in the row schema.

use tracing::{debug, error};

use crate::errors::SinkError;
use solr_sink_shared::{FieldMapping, RowSchema};

/// Row positions of the configured source fields, in mapping order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIndices(Vec<usize>);

impl ResolvedIndices {
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves source field names against a row schema.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    source_fields: Vec<String>,
}

impl FieldResolver {
    /// Create a resolver for the source side of the given mappings.
    pub fn new(mappings: &[FieldMapping]) -> Self {
        Self {
            source_fields: mappings.iter().map(|m| m.source_field.clone()).collect(),
        }
    }

    /// Resolve every source field to its position in `schema`.
    ///
    /// # Returns
    ///
    /// * `Ok(ResolvedIndices)` - One position per mapping, in mapping order
    /// * `Err(SinkError::FieldNotFound)` - Naming the first field missing from the schema
    pub fn resolve(&self, schema: &RowSchema) -> Result<ResolvedIndices, SinkError> {
        let mut indices = Vec::with_capacity(self.source_fields.len());

        for field in &self.source_fields {
            match schema.index_of(field) {
                Some(index) => indices.push(index),
                None => {
                    error!(field = %field, available = ?schema.fields(), "Error finding field in input row");
                    return Err(SinkError::field_not_found(field.as_str()));
                }
            }
        }

        debug!(indices = ?indices, "Resolved field positions");
        Ok(ResolvedIndices(indices))
    }
}
