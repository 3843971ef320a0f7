use super::{ConsistencyWarning, WarningKind};
use crate::{Blocks, Result};

use layout_blocks_core::{schema::Action, ItemId};

impl Blocks {
    /// Removes a block, keeping its content item.
    pub async fn unlink(&mut self, block_id: &ItemId) -> Result<()> {
        self.delete(block_id, false).await
    }

    /// Removes a block, deleting its content item too when `delete_item` is
    /// set. The remaining blocks of the area are renumbered densely.
    ///
    /// Once the junction row is gone the operation succeeds: failing to
    /// delete the item or to renumber is recorded as a warning.
    pub async fn delete(&mut self, block_id: &ItemId, delete_item: bool) -> Result<()> {
        let block = self.find(block_id)?.clone();
        let junction = self.descriptor.junction_collection.clone();

        self.authorize(&junction, Action::Delete)?;
        if delete_item {
            self.authorize(&block.collection, Action::Delete)?;
        }

        self.client.delete_item(&junction, block.id.clone()).await?;
        self.blocks.retain(|b| b.id != block.id);
        debug!(self.logging, block = %block.id, area = %block.area, delete_item, "block removed");

        if delete_item {
            if let Some(item_id) = &block.item_id {
                if let Err(err) = self
                    .client
                    .delete_item(&block.collection, item_id.clone())
                    .await
                {
                    self.warn(ConsistencyWarning::new(
                        WarningKind::ItemNotDeleted,
                        &block.collection,
                        Some(item_id.clone()),
                        err,
                    ));
                }
            }
        }

        self.compact(&block.area).await;
        Ok(())
    }

    /// Removes a block, deleting the item when the field is configured to.
    pub async fn remove(&mut self, block_id: &ItemId) -> Result<()> {
        let delete_item = self.options.delete_items;
        self.delete(block_id, delete_item).await
    }

    async fn compact(&mut self, area: &str) {
        if self.descriptor.sort_field().is_none() {
            return;
        }

        let ordered: Vec<ItemId> = self
            .get_blocks_for_area(area)
            .into_iter()
            .map(|b| b.id.clone())
            .collect();

        if let Err(err) = self.renumber(area, &ordered).await {
            let junction = self.descriptor.junction_collection.clone();
            self.warn(ConsistencyWarning::new(
                WarningKind::SortNotCompacted,
                &junction,
                None,
                err,
            ));
        }
    }
}
