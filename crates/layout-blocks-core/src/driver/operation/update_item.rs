use super::*;

use crate::ItemId;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateItem {
    pub collection: String,

    pub id: ItemId,

    /// Partial record; only the given keys change
    pub data: Value,
}

impl From<UpdateItem> for Operation {
    fn from(value: UpdateItem) -> Self {
        Self::UpdateItem(value)
    }
}
