//! Document mapper implementation.
//!
//! Builds one `Document` per row from the resolved field positions.

use solr_sink_shared::{Document, FieldMapping, Row, Value};

use crate::processor::ResolvedIndices;

/// Maps rows to documents using the target side of the field mappings.
#[derive(Debug, Clone)]
pub struct DocumentMapper {
    target_fields: Vec<String>,
}

impl DocumentMapper {
    pub fn new(mappings: &[FieldMapping]) -> Self {
        Self {
            target_fields: mappings.iter().map(|m| m.target_field.clone()).collect(),
        }
    }

    /// Build the document for `row`.
    ///
    /// Every mapping yields exactly one field. Null values, and positions
    /// past the end of a row, become empty strings.
    pub fn map(&self, row: &Row, indices: &ResolvedIndices) -> Document {
        let mut doc = Document::with_capacity(self.target_fields.len());

        for (target, &index) in self.target_fields.iter().zip(indices.as_slice()) {
            let value = row
                .get(index)
                .map(Value::to_document_string)
                .unwrap_or_default();
            doc.add_field(target.as_str(), value);
        }

        doc
    }
}
