use super::*;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateField {
    /// Collection receiving the new field
    pub collection: String,

    /// `{ field, type, meta, schema }` as the host expects it
    pub definition: Value,
}

impl CreateField {
    /// Name of the field being created.
    pub fn field(&self) -> Option<&str> {
        self.definition.get("field")?.as_str()
    }
}

impl From<CreateField> for Operation {
    fn from(value: CreateField) -> Self {
        Self::CreateField(value)
    }
}
