use crate::Error;

use layout_blocks_core::ItemId;

/// What was left inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A content item was created but its junction row was not.
    OrphanedItem,

    /// A junction row was deleted but its content item was not.
    ItemNotDeleted,

    /// A junction row was created but its content item could not be read
    /// back; the block shows a placeholder until the next load.
    ItemNotFetched,

    /// The remaining blocks of an area could not be renumbered after a
    /// removal; ranks have a gap.
    SortNotCompacted,
}

/// A partial failure the engine logged and carried on from.
#[derive(Debug, Clone)]
pub struct ConsistencyWarning {
    pub kind: WarningKind,
    pub collection: String,
    pub id: Option<ItemId>,
    pub cause: Error,
}

impl ConsistencyWarning {
    pub fn new(kind: WarningKind, collection: &str, id: Option<ItemId>, cause: Error) -> Self {
        ConsistencyWarning {
            kind,
            collection: collection.to_string(),
            id,
            cause,
        }
    }
}

impl core::fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let what = match self.kind {
            WarningKind::OrphanedItem => "content item left without a block",
            WarningKind::ItemNotDeleted => "content item not deleted",
            WarningKind::ItemNotFetched => "content item not loaded",
            WarningKind::SortNotCompacted => "area not renumbered",
        };

        write!(f, "{what} in `{}`", self.collection)?;
        if let Some(id) = &self.id {
            write!(f, " (id {id})")?;
        }
        write!(f, ": {}", self.cause)
    }
}
