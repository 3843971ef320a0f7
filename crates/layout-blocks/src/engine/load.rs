use super::BlockItem;
use crate::{Blocks, Result};

use layout_blocks_core::{err, Filter, ItemId, Query};
use serde_json::Value;

impl Blocks {
    /// Loads the blocks of `parent`, replacing the in-memory list.
    ///
    /// An unsaved parent (`""`, `"+"`, `"new"`) has no blocks. Rows without
    /// a collection are skipped. On failure the list is cleared and the
    /// error is kept in [`Blocks::error`].
    pub async fn load(&mut self, parent: impl Into<ItemId>) -> Result<()> {
        let parent = parent.into();
        self.parent = Some(parent.clone());
        self.error = None;

        if parent.is_unsaved() {
            debug!(self.logging, %parent, "unsaved parent; no blocks");
            self.blocks.clear();
            return Ok(());
        }

        self.loading = true;
        let result = self.fetch_blocks(&parent).await;
        self.loading = false;

        match result {
            Ok(blocks) => {
                debug!(self.logging, %parent, count = blocks.len(), "blocks loaded");
                self.blocks = blocks;
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    junction = %self.descriptor.junction_collection,
                    %parent,
                    error = %err,
                    "failed to load blocks"
                );
                self.blocks.clear();
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Loads the current parent's blocks again.
    pub async fn reload(&mut self) -> Result<()> {
        match self.parent.clone() {
            Some(parent) => self.load(parent).await,
            None => Ok(()),
        }
    }

    async fn fetch_blocks(&self, parent: &ItemId) -> Result<Vec<BlockItem>> {
        let descriptor = &*self.descriptor;

        let query = Query::new()
            .filter(Filter::eq(&*descriptor.foreign_key_field, parent.clone()))
            .fields(descriptor.load_fields())
            .sort(descriptor.load_sort())
            .limit(-1);

        let rows = self
            .client
            .query_items(&descriptor.junction_collection, query)
            .await
            .map_err(|e| e.context(err!("loading blocks of {}.{}", descriptor.parent_collection, descriptor.field)))?
            .into_rows()?;

        let mut blocks = Vec::with_capacity(rows.len());
        for row in &rows {
            let collection = row
                .get(&descriptor.collection_field)
                .and_then(Value::as_str)
                .unwrap_or_default();

            if collection.is_empty() {
                tracing::warn!(
                    junction = %descriptor.junction_collection,
                    row = ?row.get(&descriptor.primary_key_field),
                    "skipping junction row without a collection"
                );
                continue;
            }

            blocks.push(BlockItem::from_row(row, descriptor, &self.options.default_area)?);
        }

        Ok(blocks)
    }
}
