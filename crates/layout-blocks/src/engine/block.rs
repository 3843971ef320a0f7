use crate::{Error, JunctionDescriptor, Result};

use heck::ToTitleCase;
use layout_blocks_core::ItemId;
use serde::Serialize;
use serde_json::Value;

/// One placed block: a junction row joined with its content item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockItem {
    /// Junction row id.
    pub id: ItemId,

    pub area: String,

    /// Rank within the area. Unique per area only; gaps are allowed.
    pub sort: f64,

    /// Collection of the content item.
    pub collection: String,

    /// Id of the content item, when the junction row references one.
    pub item_id: Option<ItemId>,

    /// The content item's fields.
    pub item: Value,
}

const TITLE_FIELDS: &[&str] = &["title", "name", "headline", "label", "heading"];
const SUBTITLE_FIELDS: &[&str] = &["subtitle", "description", "excerpt", "summary"];

impl BlockItem {
    pub fn new(
        id: impl Into<ItemId>,
        area: impl Into<String>,
        sort: f64,
        collection: impl Into<String>,
        item: Value,
    ) -> BlockItem {
        BlockItem {
            id: id.into(),
            area: area.into(),
            sort,
            collection: collection.into(),
            item_id: item.get("id").and_then(ItemId::from_value),
            item,
        }
    }

    /// Builds a block from a junction row loaded with its item expanded.
    pub(crate) fn from_row(
        row: &Value,
        descriptor: &JunctionDescriptor,
        default_area: &str,
    ) -> Result<BlockItem> {
        let junction = &descriptor.junction_collection;

        let Some(id) = row
            .get(&descriptor.primary_key_field)
            .and_then(ItemId::from_value)
        else {
            return Err(Error::invalid_response(format!(
                "`{junction}` row without primary key `{}`",
                descriptor.primary_key_field
            )));
        };

        let Some(collection) = row
            .get(&descriptor.collection_field)
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
        else {
            return Err(Error::invalid_response(format!(
                "`{junction}` row {id} without a collection in `{}`",
                descriptor.collection_field
            )));
        };

        let area = descriptor
            .area_field()
            .and_then(|field| row.get(field))
            .and_then(Value::as_str)
            .filter(|area| !area.is_empty())
            .unwrap_or(default_area);

        let sort = descriptor
            .sort_field()
            .and_then(|field| row.get(field))
            .and_then(rank)
            .unwrap_or(0.0);

        let (item_id, item) = match row.get(&descriptor.item_field) {
            Some(item @ Value::Object(_)) => (item.get("id").and_then(ItemId::from_value), item.clone()),
            Some(reference) => match ItemId::from_value(reference) {
                Some(item_id) => (Some(item_id.clone()), serde_json::json!({ "id": item_id })),
                None => (None, Value::Object(Default::default())),
            },
            None => (None, Value::Object(Default::default())),
        };

        Ok(BlockItem {
            id,
            area: area.to_string(),
            sort,
            collection: collection.to_string(),
            item_id,
            item,
        })
    }

    /// Display title: the first title-like item field, else
    /// `"{Collection Label} #{id}"`.
    pub fn title(&self) -> String {
        if !self.item.is_object() {
            return format!("Block #{}", self.id);
        }

        first_text(&self.item, TITLE_FIELDS)
            .map(String::from)
            .unwrap_or_else(|| format!("{} #{}", collection_label(&self.collection), self.id))
    }

    pub fn subtitle(&self) -> Option<&str> {
        first_text(&self.item, SUBTITLE_FIELDS)
    }
}

/// Human label for a collection name: `content_text` becomes `Text`.
pub fn collection_label(collection: &str) -> String {
    let label = collection.to_title_case();
    match label.strip_prefix("Content ") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => label,
    }
}

fn first_text<'a>(item: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| item.get(*field)?.as_str())
        .find(|text| !text.is_empty())
}

/// Ranks arrive as numbers, or as strings for decimal columns.
fn rank(value: &Value) -> Option<f64> {
    let rank = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    rank.filter(|rank| rank.is_finite())
}
