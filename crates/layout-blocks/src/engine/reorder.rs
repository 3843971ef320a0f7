use super::sort::{self, Placement};
use crate::{Blocks, Error, Result};

use layout_blocks_core::{schema::Action, ItemId};
use serde_json::Value;

impl Blocks {
    /// Moves a block to `area`, at `index` among the area's other blocks
    /// when given, else to its end. A block already last stays put.
    ///
    /// Only the moved row is written, unless no rank fits between the new
    /// neighbours; the area is then renumbered densely.
    pub async fn move_block(&mut self, block_id: &ItemId, area: &str, index: Option<usize>) -> Result<()> {
        let block = self.find(block_id)?.clone();
        let changes_area = block.area != area;

        if changes_area {
            self.check_move(&block, area)?;
        } else {
            self.check_unlocked(area)?;
        }

        if index.is_some() && self.descriptor.sort_field().is_none() {
            return Err(Error::validation_for(
                &*self.descriptor.junction_collection,
                "the junction has no sort column; blocks cannot be positioned",
            ));
        }

        let junction = self.descriptor.junction_collection.clone();
        self.authorize(&junction, Action::Update)?;

        let siblings: Vec<(ItemId, f64)> = self
            .get_blocks_for_area(area)
            .into_iter()
            .filter(|b| b.id != block.id)
            .map(|b| (b.id.clone(), b.sort))
            .collect();
        let ranks: Vec<f64> = siblings.iter().map(|(_, rank)| *rank).collect();

        let placement = match index {
            Some(index) => sort::place(&ranks, index, self.descriptor.sort_storage),
            None if !changes_area && ranks.iter().all(|&rank| rank < block.sort) => {
                debug!(self.logging, block = %block.id, area, "block already last");
                return Ok(());
            }
            None => Placement::At(sort::next_sort(ranks.iter().copied())),
        };

        match placement {
            Placement::At(rank) => {
                let data = self.placement_data(changes_area.then_some(area), Some(rank));
                if !data.is_empty() {
                    self.client
                        .update_item(&junction, block.id.clone(), Value::Object(data))
                        .await?;
                }

                if let Some(moved) = self.find_mut(&block.id) {
                    moved.area = area.to_string();
                    moved.sort = rank;
                }
                debug!(self.logging, block = %block.id, area, rank, "block moved");
                Ok(())
            }
            Placement::Renumber => {
                let mut ordered: Vec<ItemId> = siblings.into_iter().map(|(id, _)| id).collect();
                let at = index.unwrap_or(ordered.len()).min(ordered.len());
                ordered.insert(at, block.id.clone());

                debug!(self.logging, block = %block.id, area, "no rank between neighbours; renumbering");
                self.renumber(area, &ordered).await
            }
        }
    }

    /// Sets the order of blocks in `area` to `ordered`, ranking them
    /// `0..n`. Only rows whose rank changes are written.
    pub async fn reorder(&mut self, area: &str, ordered: &[ItemId]) -> Result<()> {
        let junction = self.descriptor.junction_collection.clone();

        if self.descriptor.sort_field().is_none() {
            return Err(Error::validation_for(
                junction,
                "the junction has no sort column; blocks cannot be reordered",
            ));
        }

        self.check_unlocked(area)?;

        if !self.gate.can_reorder(&junction) {
            return Err(Error::permission(junction, Action::Update.as_str()));
        }

        for id in ordered {
            let block = self.find(id)?;
            if block.area != area {
                return Err(Error::validation(format!(
                    "block {id} is in area `{}`, not `{area}`",
                    block.area
                )));
            }
        }

        self.renumber(area, ordered).await
    }

    /// Ranks `ordered` as `0..n` in `area`, moving blocks into the area
    /// where needed. Writes are issued together; once all have settled the
    /// successful ones are applied and the first failure, if any, returned.
    pub(crate) async fn renumber(&mut self, area: &str, ordered: &[ItemId]) -> Result<()> {
        let mut writes = vec![];

        for (index, id) in ordered.iter().enumerate() {
            let block = self.find(id)?;
            let rank = index as f64;
            let changes_area = block.area != area;

            if block.sort == rank && !changes_area {
                continue;
            }

            let data = self.placement_data(changes_area.then_some(area), Some(rank));
            writes.push((id.clone(), rank, data));
        }

        if writes.is_empty() {
            return Ok(());
        }

        let junction = &self.descriptor.junction_collection;
        let client = &self.client;
        let results = futures::future::join_all(writes.iter().map(|(id, _, data)| {
            client.update_item(junction, id.clone(), Value::Object(data.clone()))
        }))
        .await;

        debug!(self.logging, area, writes = writes.len(), "area renumbered");

        let mut first_err = None;
        for ((id, rank, _), result) in writes.into_iter().zip(results) {
            match result {
                Ok(_) => {
                    if let Some(block) = self.find_mut(&id) {
                        block.area = area.to_string();
                        block.sort = rank;
                    }
                }
                Err(err) => {
                    tracing::error!(block = %id, area, error = %err, "failed to write block rank");
                    first_err.get_or_insert(err);
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
