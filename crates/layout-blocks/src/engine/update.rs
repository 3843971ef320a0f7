use crate::{Blocks, Error, Result};

use layout_blocks_core::{schema::Action, ItemId};
use serde_json::Value;

impl Blocks {
    /// Patches the content item behind a block. `updates` is an object of
    /// field values; it is merged into the in-memory item once the host
    /// accepted it.
    pub async fn update(&mut self, block_id: &ItemId, updates: Value) -> Result<()> {
        let block = self.find(block_id)?;
        let collection = block.collection.clone();

        let Some(item_id) = block.item_id.clone() else {
            return Err(Error::validation_for(
                collection,
                format!("block {block_id} does not reference an item"),
            ));
        };

        let Value::Object(fields) = &updates else {
            return Err(Error::validation("item updates must be an object of field values"));
        };
        let fields = fields.clone();

        self.authorize(&collection, Action::Update)?;

        self.client
            .update_item(&collection, item_id, updates)
            .await?;

        if let Some(block) = self.find_mut(block_id) {
            match &mut block.item {
                Value::Object(item) => item.extend(fields),
                item => *item = Value::Object(fields),
            }
        }

        debug!(self.logging, block = %block_id, %collection, "item updated");
        Ok(())
    }
}
