use crate::{Client, Result};

use layout_blocks_core::schema::Field;
use serde_json::{Map, Value};

/// Columns maintained by the host or by the junction itself.
const SYSTEM_FIELDS: &[&str] = &[
    "id",
    "user_created",
    "user_updated",
    "date_created",
    "date_updated",
    "sort",
    "status",
];

/// Initial payload for a new item of `collection`, built from the
/// collection's field metadata.
pub async fn default_item_data(client: &Client, collection: &str) -> Result<Value> {
    let fields = client.fields(collection).await?;

    let data: Map<String, Value> = fields
        .iter()
        .filter_map(|field| Some((field.field.clone(), default_value_for(field)?)))
        .collect();

    Ok(Value::Object(data))
}

/// Default value for one field. `None` when the field is not part of a new
/// item's payload at all: system, hidden, and alias fields.
pub fn default_value_for(field: &Field) -> Option<Value> {
    if SYSTEM_FIELDS.contains(&field.field.as_str()) || field.is_hidden() || field.is_alias() {
        return None;
    }

    let schema = field.schema.as_ref();
    if let Some(default) = schema.and_then(|s| s.default_value.as_ref()) {
        if !default.is_null() {
            return Some(default.clone());
        }
    }

    Some(match field.ty.as_str() {
        "string" | "text" => Value::String(String::new()),
        "integer" | "bigInteger" | "float" | "decimal" => {
            if schema.is_some_and(|s| s.foreign_key_table.is_some()) {
                Value::Null
            } else {
                Value::from(0)
            }
        }
        "boolean" => Value::Bool(false),
        _ => Value::Null,
    })
}
