use super::*;

use crate::ItemId;

#[derive(Debug, Clone, PartialEq)]
pub struct GetItem {
    pub collection: String,

    pub id: ItemId,

    /// Which fields to return; empty returns the host default
    pub fields: Vec<String>,
}

impl From<GetItem> for Operation {
    fn from(value: GetItem) -> Self {
        Self::GetItem(value)
    }
}
