use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A collection record from `GET /collections`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub collection: String,

    #[serde(default)]
    pub meta: Option<Value>,

    #[serde(default)]
    pub schema: Option<Value>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Collection {
        Collection {
            collection: name.into(),
            meta: None,
            schema: None,
        }
    }

    /// Folders have metadata but no backing table.
    pub fn is_folder(&self) -> bool {
        self.meta.is_some() && self.schema.is_none()
    }
}
