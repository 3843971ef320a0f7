use super::*;

use crate::Filter;

use serde_json::Value;

/// Patch every row matching a filter with the same partial record.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateItems {
    pub collection: String,
    pub filter: Filter,
    pub data: Value,
}

impl From<UpdateItems> for Operation {
    fn from(value: UpdateItems) -> Self {
        Self::UpdateItems(value)
    }
}
