//! Placement rules for areas.

use crate::{AreaConfig, BlockItem, Error, Result};

pub const MAX_AREA_ID_LENGTH: usize = 64;
pub const MAX_AREA_LABEL_LENGTH: usize = 255;

/// 1 to 64 characters of `[A-Za-z0-9_-]`.
pub fn validate_area_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_AREA_ID_LENGTH
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Problems with an area definition. Empty when the definition is usable.
pub fn validate_area_config(area: &AreaConfig) -> Vec<String> {
    let mut errors = vec![];

    if !validate_area_id(&area.id) {
        errors.push(format!(
            "area id `{}` must be 1 to {MAX_AREA_ID_LENGTH} letters, digits, dashes or underscores",
            area.id
        ));
    }

    if area.label.is_empty() || area.label.chars().count() > MAX_AREA_LABEL_LENGTH {
        errors.push(format!(
            "area label is required and must be at most {MAX_AREA_LABEL_LENGTH} characters"
        ));
    }

    if let (Some(min), Some(max)) = (area.min_items, area.max_items) {
        if min > max {
            errors.push(format!("min items ({min}) cannot be greater than max items ({max})"));
        }
    }

    errors
}

/// Whether a block of `collection` may be added to `area`, given the blocks
/// currently placed.
pub fn can_add_block_to_area(
    area: &AreaConfig,
    blocks: &[BlockItem],
    collection: Option<&str>,
) -> Result<()> {
    if let Some(max) = area.max_items {
        let count = blocks.iter().filter(|b| b.area == area.id).count();
        if count >= max {
            return Err(Error::validation(format!(
                "area \"{}\" already has the maximum number of items ({max})",
                area.label
            )));
        }
    }

    if let Some(collection) = collection {
        if !area.accepts(collection) {
            return Err(Error::validation_for(
                collection,
                format!("collection `{collection}` is not allowed in area \"{}\"", area.label),
            ));
        }
    }

    if area.locked {
        return Err(Error::validation(format!("area \"{}\" is locked", area.label)));
    }

    Ok(())
}

/// Whether `block` may move from `from` to `to`.
pub fn validate_block_move(
    block: &BlockItem,
    from: &AreaConfig,
    to: &AreaConfig,
    blocks: &[BlockItem],
) -> Result<()> {
    if from.locked {
        return Err(Error::validation(format!(
            "cannot move blocks out of locked area \"{}\"",
            from.label
        )));
    }

    can_add_block_to_area(to, blocks, Some(&block.collection))
}

/// Turns free text into a valid area id: lowercased, runs of other
/// characters collapsed to one dash, trimmed, truncated.
pub fn sanitize_area_id(input: &str) -> String {
    let mut id = String::with_capacity(input.len());

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            id.push(c);
        } else if !id.ends_with('-') {
            id.push('-');
        }
    }

    id.trim_matches('-').chars().take(MAX_AREA_ID_LENGTH).collect()
}
