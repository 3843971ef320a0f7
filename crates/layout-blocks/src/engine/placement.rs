use super::BlockItem;
use crate::{validate, Blocks, Error, Result};

use layout_blocks_core::ItemId;

impl Blocks {
    /// Whether a new block of `collection` may be placed in `area`.
    pub(crate) fn check_placement(&self, area: &str, collection: &str) -> Result<()> {
        self.check_area_id(area)?;

        if !self.descriptor.allows(collection) || !self.options.allows_collection(collection) {
            return Err(Error::validation_for(
                collection,
                format!(
                    "collection `{collection}` is not allowed in {}.{}",
                    self.descriptor.parent_collection, self.descriptor.field
                ),
            ));
        }

        if let Some(max) = self.options.max_total_blocks {
            if self.blocks.len() >= max {
                return Err(Error::validation(format!(
                    "the field already holds the maximum number of blocks ({max})"
                )));
            }
        }

        self.check_area_capacity(area)?;

        match self.options.area(area) {
            Some(config) => validate::can_add_block_to_area(config, &self.blocks, Some(collection)),
            None => Ok(()),
        }
    }

    /// Whether `block` may move into a different `area`.
    pub(crate) fn check_move(&self, block: &BlockItem, area: &str) -> Result<()> {
        self.check_area_id(area)?;

        if self.descriptor.area_field().is_none() {
            return Err(Error::validation_for(
                &*self.descriptor.junction_collection,
                "the junction has no area column; blocks cannot change area",
            ));
        }

        self.check_area_capacity(area)?;

        match (self.options.area(&block.area), self.options.area(area)) {
            (Some(from), Some(to)) => validate::validate_block_move(block, from, to, &self.blocks),
            (Some(from), None) if from.locked => Err(Error::validation(format!(
                "cannot move blocks out of locked area \"{}\"",
                from.label
            ))),
            (None, Some(to)) => {
                validate::can_add_block_to_area(to, &self.blocks, Some(&block.collection))
            }
            _ => Ok(()),
        }
    }

    /// Reordering within an area is refused when the area is locked.
    pub(crate) fn check_unlocked(&self, area: &str) -> Result<()> {
        match self.options.area(area) {
            Some(config) if config.locked => Err(Error::validation(format!(
                "area \"{}\" is locked",
                config.label
            ))),
            _ => Ok(()),
        }
    }

    /// Advisory check for moving a block into `area`, without calling the
    /// host.
    pub fn can_move_to_area(&self, block_id: &ItemId, area: &str) -> bool {
        let Ok(block) = self.find(block_id) else {
            return false;
        };

        if block.area == area {
            return self.check_unlocked(area).is_ok();
        }

        self.check_move(block, area).is_ok()
    }

    fn check_area_id(&self, area: &str) -> Result<()> {
        if validate::validate_area_id(area) {
            Ok(())
        } else {
            Err(Error::validation(format!("invalid area id `{area}`")))
        }
    }

    fn check_area_capacity(&self, area: &str) -> Result<()> {
        let Some(max) = self.options.max_items_per_area else {
            return Ok(());
        };

        if self.blocks.iter().filter(|b| b.area == area).count() >= max {
            return Err(Error::validation(format!(
                "area `{area}` already holds the maximum number of blocks ({max})"
            )));
        }

        Ok(())
    }
}
