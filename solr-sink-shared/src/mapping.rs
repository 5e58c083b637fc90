//! Row field to document field mappings.

/// Maps one source column of the incoming rows to one field of the
/// outbound document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Column name in the incoming row.
    pub source_field: String,
    /// Field name in the submitted document.
    pub target_field: String,
}

impl FieldMapping {
    pub fn new(source_field: impl Into<String>, target_field: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            target_field: target_field.into(),
        }
    }
}
