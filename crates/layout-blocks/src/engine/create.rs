use super::{sort, BlockItem, ConsistencyWarning, WarningKind};
use crate::{Blocks, Error, Result};

use layout_blocks_core::{schema::Action, ItemId};
use serde_json::{json, Map, Value};

/// Host-maintained fields dropped when copying an item.
const COPY_SKIPPED_FIELDS: &[&str] = &["id", "user_created", "user_updated", "date_created", "date_updated"];

const TITLE_FIELDS: &[&str] = &["title", "name", "headline", "label", "heading"];

impl Blocks {
    /// Creates a content item in `collection` from `data` and appends it to
    /// `area` as a new block.
    ///
    /// When the item is created but the junction row is not, the item is
    /// left behind: a warning is recorded and the error returned.
    pub async fn create(&mut self, area: &str, collection: &str, data: Value) -> Result<BlockItem> {
        let parent = self.saved_parent()?;
        self.check_placement(area, collection)?;
        self.authorize(collection, Action::Create)?;
        self.authorize(&self.descriptor.junction_collection, Action::Create)?;

        self.create_unchecked(parent, area, collection, data).await
    }

    /// Appends an existing item of `collection` to `area`.
    pub async fn link(
        &mut self,
        area: &str,
        collection: &str,
        item_id: impl Into<ItemId>,
    ) -> Result<BlockItem> {
        let item_id = item_id.into();
        let parent = self.saved_parent()?;
        self.check_placement(area, collection)?;

        if !self.gate.can_link(collection) {
            return Err(Error::permission(collection, Action::Read.as_str()));
        }
        self.authorize(&self.descriptor.junction_collection, Action::Create)?;

        let rank = self.next_rank(area);
        let id = self
            .insert_row(&parent, area, collection, &item_id, rank)
            .await?;

        let item = match self.client.get_item(collection, item_id.clone(), &["*"]).await {
            Ok(item) => item,
            Err(err) => {
                self.warn(ConsistencyWarning::new(
                    WarningKind::ItemNotFetched,
                    collection,
                    Some(item_id.clone()),
                    err,
                ));
                json!({ "id": item_id })
            }
        };

        let block = BlockItem {
            id,
            area: area.to_string(),
            sort: rank,
            collection: collection.to_string(),
            item_id: Some(item_id),
            item,
        };
        debug!(self.logging, block = %block.id, area, collection, "item linked");
        self.blocks.push(block.clone());
        Ok(block)
    }

    /// Creates a copy of `source`, an item of `collection`, and appends it to
    /// `area`. See [`copy_payload`] for what is copied.
    pub async fn duplicate(&mut self, area: &str, collection: &str, source: &Value) -> Result<BlockItem> {
        let parent = self.saved_parent()?;
        self.check_placement(area, collection)?;

        if !self.gate.can_duplicate(collection) {
            return Err(Error::permission(collection, "duplicate"));
        }
        self.authorize(&self.descriptor.junction_collection, Action::Create)?;

        self.create_unchecked(parent, area, collection, copy_payload(source))
            .await
    }

    /// Duplicates a loaded block and places the copy right after it.
    pub async fn duplicate_block(&mut self, block_id: &ItemId) -> Result<BlockItem> {
        let original = self.find(block_id)?.clone();

        let siblings = self.get_blocks_for_area(&original.area);
        let position = siblings.iter().position(|b| b.id == original.id);
        let was_last = position.map_or(true, |i| i + 1 == siblings.len());

        let copy = self
            .duplicate(&original.area, &original.collection, &original.item)
            .await?;

        if let (false, Some(position)) = (was_last, position) {
            self.move_block(&copy.id, &original.area, Some(position + 1))
                .await?;
        }

        Ok(self.find(&copy.id)?.clone())
    }

    async fn create_unchecked(
        &mut self,
        parent: ItemId,
        area: &str,
        collection: &str,
        data: Value,
    ) -> Result<BlockItem> {
        let item = self.client.create_item(collection, data).await?;
        let Some(item_id) = item.get("id").and_then(ItemId::from_value) else {
            return Err(Error::invalid_response(format!(
                "created `{collection}` item has no id"
            )));
        };

        let rank = self.next_rank(area);
        let id = match self
            .insert_row(&parent, area, collection, &item_id, rank)
            .await
        {
            Ok(id) => id,
            Err(err) => {
                self.warn(ConsistencyWarning::new(
                    WarningKind::OrphanedItem,
                    collection,
                    Some(item_id),
                    err.clone(),
                ));
                return Err(err);
            }
        };

        let block = BlockItem {
            id,
            area: area.to_string(),
            sort: rank,
            collection: collection.to_string(),
            item_id: Some(item_id),
            item,
        };
        debug!(self.logging, block = %block.id, area, collection, "block created");
        self.blocks.push(block.clone());
        Ok(block)
    }

    /// Writes a junction row and returns its id.
    async fn insert_row(
        &self,
        parent: &ItemId,
        area: &str,
        collection: &str,
        item_id: &ItemId,
        rank: f64,
    ) -> Result<ItemId> {
        let descriptor = &*self.descriptor;

        let mut data = Map::new();
        data.insert(descriptor.foreign_key_field.clone(), parent.to_value());
        data.insert(descriptor.item_field.clone(), item_id.to_value());
        data.insert(descriptor.collection_field.clone(), Value::from(collection));
        data.extend(self.placement_data(Some(area), Some(rank)));

        let row = self
            .client
            .create_item(&descriptor.junction_collection, Value::Object(data))
            .await?;

        row.get(&descriptor.primary_key_field)
            .and_then(ItemId::from_value)
            .ok_or_else(|| {
                Error::invalid_response(format!(
                    "created `{}` row has no `{}`",
                    descriptor.junction_collection, descriptor.primary_key_field
                ))
            })
    }

    fn next_rank(&self, area: &str) -> f64 {
        sort::next_sort(
            self.blocks
                .iter()
                .filter(|b| b.area == area)
                .map(|b| b.sort),
        )
    }
}

/// The payload for copying an item: host-maintained fields are dropped and
/// the first non-empty title-like field gets a `" (Copy)"` suffix.
pub fn copy_payload(source: &Value) -> Value {
    let Some(source) = source.as_object() else {
        return Value::Object(Map::new());
    };

    let mut copy: Map<String, Value> = source
        .iter()
        .filter(|(field, _)| !COPY_SKIPPED_FIELDS.contains(&field.as_str()))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect();

    let title = TITLE_FIELDS.iter().find(|field| {
        copy.get(**field)
            .and_then(Value::as_str)
            .is_some_and(|text| !text.is_empty())
    });

    if let Some(field) = title {
        if let Some(Value::String(text)) = copy.get_mut(*field) {
            text.push_str(" (Copy)");
        }
    }

    Value::Object(copy)
}
