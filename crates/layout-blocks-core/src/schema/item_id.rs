use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity of a record: hosts use either auto-increment integers or
/// string keys (UUIDs, slugs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl ItemId {
    /// Reads an identity out of a JSON value. Integral numbers and non-empty
    /// strings qualify; anything else does not.
    pub fn from_value(value: &Value) -> Option<ItemId> {
        match value {
            Value::Number(n) => n.as_i64().map(ItemId::Int),
            Value::String(s) if !s.is_empty() => Some(ItemId::Str(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ItemId::Int(id) => Value::from(*id),
            ItemId::Str(id) => Value::from(id.as_str()),
        }
    }

    /// Returns `true` for the placeholders the admin panel uses for a record
    /// that has not been saved yet.
    pub fn is_unsaved(&self) -> bool {
        matches!(self, ItemId::Str(s) if s.is_empty() || s == "+" || s == "new")
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            ItemId::Int(id) => core::fmt::Display::fmt(id, f),
            ItemId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        ItemId::Int(value)
    }
}

impl From<i32> for ItemId {
    fn from(value: i32) -> Self {
        ItemId::Int(value.into())
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId::Str(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        ItemId::Str(value)
    }
}

impl From<ItemId> for Value {
    fn from(value: ItemId) -> Self {
        value.to_value()
    }
}
