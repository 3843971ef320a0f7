//! Block operations: loading, creating, linking, updating, moving,
//! reordering, and removing blocks.

mod block;
pub use block::{collection_label, BlockItem};

mod create;
pub use create::copy_payload;

mod load;

mod placement;

mod remove;

mod reorder;

pub mod sort;

mod update;

mod warning;
pub use warning::{ConsistencyWarning, WarningKind};

use crate::{Blocks, Error, Result};

use layout_blocks_core::{schema::Action, ItemId};
use serde_json::{Map, Value};

impl Blocks {
    /// Blocks of `area` by ascending rank. Blocks with equal ranks keep
    /// their load order.
    pub fn get_blocks_for_area(&self, area: &str) -> Vec<&BlockItem> {
        let mut blocks: Vec<_> = self.blocks.iter().filter(|b| b.area == area).collect();
        blocks.sort_by(|a, b| a.sort.total_cmp(&b.sort));
        blocks
    }

    pub(crate) fn find(&self, id: &ItemId) -> Result<&BlockItem> {
        self.block(id).ok_or_else(|| Error::block_not_found(id))
    }

    pub(crate) fn find_mut(&mut self, id: &ItemId) -> Option<&mut BlockItem> {
        self.blocks.iter_mut().find(|block| &block.id == id)
    }

    /// The parent blocks are attached to. Writes need a saved parent.
    pub(crate) fn saved_parent(&self) -> Result<ItemId> {
        match &self.parent {
            Some(parent) if !parent.is_unsaved() => Ok(parent.clone()),
            _ => Err(Error::validation(
                "the parent record must be saved before blocks can be attached",
            )),
        }
    }

    pub(crate) fn authorize(&self, collection: &str, action: Action) -> Result<()> {
        if self.gate.check(collection, action) {
            Ok(())
        } else {
            debug!(self.logging, collection, %action, "permission denied");
            Err(Error::permission(collection, action.as_str()))
        }
    }

    /// Junction column values for a block's placement. Columns the junction
    /// lacks are left out.
    pub(crate) fn placement_data(&self, area: Option<&str>, rank: Option<f64>) -> Map<String, Value> {
        let mut data = Map::new();

        if let (Some(column), Some(area)) = (self.descriptor.area_field(), area) {
            data.insert(column.to_string(), Value::from(area));
        }
        if let (Some(column), Some(rank)) = (self.descriptor.sort_field(), rank) {
            data.insert(column.to_string(), sort::sort_value(rank));
        }

        data
    }

    pub(crate) fn warn(&mut self, warning: ConsistencyWarning) {
        tracing::warn!(
            kind = ?warning.kind,
            collection = %warning.collection,
            id = ?warning.id,
            "{warning}"
        );
        self.warnings.push(warning);
    }
}
