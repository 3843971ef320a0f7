//! Host metadata records, as returned by the generic fields, relations,
//! collections, permissions, and users endpoints.

mod collection;
pub use collection::Collection;

mod field;
pub use field::{Field, FieldMeta, FieldSchema};

mod item_id;
pub use item_id::ItemId;

mod permission;
pub use permission::{Action, PermissionRecord, User, UserRole};

mod relation;
pub use relation::{Relation, RelationMeta};

use serde::{Deserialize, Deserializer};

/// Hosts encode list-valued metadata either as a JSON array or as a
/// comma-separated string; `null` means empty.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    List(Vec<String>),
    Csv(String),
}

pub(crate) fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrList>::deserialize(deserializer)? {
        Some(StringOrList::List(list)) => list,
        Some(StringOrList::Csv(csv)) => csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    })
}
