//! Rows and the schema they conform to.

use std::collections::HashSet;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::value::Value;

/// Errors raised while building rows or schemas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The number of values differs from the number of schema fields.
    #[error("Row has {actual} values but schema has {expected} fields")]
    WidthMismatch { expected: usize, actual: usize },

    /// A column name appears more than once in a schema.
    #[error("Duplicate field in schema: {0}")]
    DuplicateField(String),
}

/// Ordered column names shared by every row of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowSchema {
    fields: Vec<String>,
}

impl RowSchema {
    /// Create a schema from column names. Names must be unique.
    pub fn new<I, S>(fields: I) -> Result<Self, RowError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.as_str()) {
                return Err(RowError::DuplicateField(field.clone()));
            }
        }
        Ok(Self { fields })
    }

    /// Position of the named column.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Column names in order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A copy of this schema with one more column at the end.
    pub fn with_field(&self, name: impl Into<String>) -> Result<Self, RowError> {
        let name = name.into();
        if self.index_of(&name).is_some() {
            return Err(RowError::DuplicateField(name));
        }
        let mut fields = self.fields.clone();
        fields.push(name);
        Ok(Self { fields })
    }
}

/// One record flowing through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<RowSchema>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row. The value count must match the schema width.
    pub fn new(schema: Arc<RowSchema>, values: Vec<Value>) -> Result<Self, RowError> {
        if schema.len() != values.len() {
            return Err(RowError::WidthMismatch {
                expected: schema.len(),
                actual: values.len(),
            });
        }
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at the given position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Value of the named column.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).and_then(|i| self.values.get(i))
    }

    /// Consume the row and append one value under an extended schema.
    ///
    /// `schema` must be this row's schema plus exactly one trailing field.
    pub fn with_appended(self, schema: Arc<RowSchema>, value: Value) -> Result<Self, RowError> {
        let mut values = self.values;
        values.push(value);
        Row::new(schema, values)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.schema.fields().iter().zip(&self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
