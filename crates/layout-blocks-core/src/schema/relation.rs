use super::string_or_list;

use serde::{Deserialize, Serialize};

/// A relation record from `GET /relations`.
///
/// The "many" side is `collection.field`; the "one" side is
/// `related_collection`, with the reverse alias field in `meta.one_field`.
/// A polymorphic relation has no `related_collection` and instead names the
/// column holding the target collection in `meta.one_collection_field`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub collection: String,

    pub field: String,

    #[serde(default)]
    pub related_collection: Option<String>,

    #[serde(default)]
    pub meta: Option<RelationMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationMeta {
    #[serde(default)]
    pub one_field: Option<String>,

    #[serde(default)]
    pub one_collection_field: Option<String>,

    #[serde(default, deserialize_with = "string_or_list")]
    pub one_allowed_collections: Vec<String>,

    #[serde(default)]
    pub junction_field: Option<String>,

    #[serde(default)]
    pub junction_collection: Option<String>,

    #[serde(default)]
    pub sort_field: Option<String>,

    #[serde(default, deserialize_with = "string_or_list")]
    pub special: Vec<String>,
}

impl Relation {
    pub fn one_field(&self) -> Option<&str> {
        self.meta.as_ref()?.one_field.as_deref()
    }

    pub fn one_collection_field(&self) -> Option<&str> {
        self.meta.as_ref()?.one_collection_field.as_deref()
    }

    pub fn junction_field(&self) -> Option<&str> {
        self.meta.as_ref()?.junction_field.as_deref()
    }

    pub fn allowed_collections(&self) -> &[String] {
        self.meta
            .as_ref()
            .map(|meta| &meta.one_allowed_collections[..])
            .unwrap_or(&[])
    }

    pub fn has_special(&self, marker: &str) -> bool {
        self.meta
            .as_ref()
            .is_some_and(|meta| meta.special.iter().any(|s| s == marker))
    }

    /// Returns `true` if this is the polymorphic (any-collection) side of a
    /// many-to-any relation.
    pub fn is_polymorphic(&self) -> bool {
        self.one_collection_field().is_some()
            || !self.allowed_collections().is_empty()
            || self.has_special("m2a")
    }
}
