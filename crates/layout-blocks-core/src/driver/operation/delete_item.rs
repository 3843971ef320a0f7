use super::*;

use crate::ItemId;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteItem {
    pub collection: String,
    pub id: ItemId,
}

impl From<DeleteItem> for Operation {
    fn from(value: DeleteItem) -> Self {
        Self::DeleteItem(value)
    }
}
