use super::*;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateItem {
    pub collection: String,
    pub data: Value,
}

impl From<CreateItem> for Operation {
    fn from(value: CreateItem) -> Self {
        Self::CreateItem(value)
    }
}
