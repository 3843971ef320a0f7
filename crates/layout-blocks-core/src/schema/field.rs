use super::string_or_list;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A field record from `GET /fields/{collection}[/{field}]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub collection: String,

    pub field: String,

    /// Logical type (`string`, `integer`, `alias`, ...).
    #[serde(rename = "type", default)]
    pub ty: String,

    #[serde(default)]
    pub meta: Option<FieldMeta>,

    #[serde(default)]
    pub schema: Option<FieldSchema>,
}

/// Admin-panel metadata attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    #[serde(default)]
    pub interface: Option<String>,

    /// Special markers such as `m2a`, `m2a-collection`, `date-created`.
    #[serde(default, deserialize_with = "string_or_list")]
    pub special: Vec<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub options: Option<Value>,

    #[serde(default)]
    pub junction_collection: Option<String>,

    #[serde(default)]
    pub junction_field: Option<String>,

    #[serde(default)]
    pub one_collection_field: Option<String>,

    #[serde(default, deserialize_with = "string_or_list")]
    pub one_allowed_collections: Vec<String>,
}

/// Storage-level description of a field. Absent for alias fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(default)]
    pub data_type: Option<String>,

    #[serde(default)]
    pub is_primary_key: bool,

    #[serde(default = "default_true")]
    pub is_nullable: bool,

    #[serde(default)]
    pub default_value: Option<Value>,

    #[serde(default)]
    pub foreign_key_table: Option<String>,

    #[serde(default)]
    pub max_length: Option<u64>,

    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<String>>,

    #[serde(default)]
    pub allowed_values: Option<Vec<String>>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        FieldSchema {
            data_type: None,
            is_primary_key: false,
            is_nullable: true,
            default_value: None,
            foreign_key_table: None,
            max_length: None,
            enum_values: None,
            allowed_values: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Field {
    pub fn new(collection: impl Into<String>, field: impl Into<String>, ty: impl Into<String>) -> Field {
        Field {
            collection: collection.into(),
            field: field.into(),
            ty: ty.into(),
            meta: None,
            schema: None,
        }
    }

    pub fn has_special(&self, marker: &str) -> bool {
        self.meta
            .as_ref()
            .is_some_and(|meta| meta.special.iter().any(|s| s == marker))
    }

    /// Returns `true` for an alias field carrying the many-to-any marker.
    pub fn is_m2a(&self) -> bool {
        self.ty == "alias" && self.has_special("m2a")
    }

    pub fn is_alias(&self) -> bool {
        self.ty == "alias"
    }

    pub fn is_hidden(&self) -> bool {
        self.meta.as_ref().is_some_and(|meta| meta.hidden)
    }

    pub fn is_primary_key(&self) -> bool {
        self.schema.as_ref().is_some_and(|schema| schema.is_primary_key)
    }

    /// The stored type: the logical type when known, else the column's data type.
    pub fn storage_type(&self) -> Option<&str> {
        if !self.ty.is_empty() {
            return Some(&self.ty);
        }
        self.schema.as_ref()?.data_type.as_deref()
    }

    /// Values this field is constrained to, read from the column enum, the
    /// column's allowed values, or the interface's `choices` option, in that
    /// order.
    pub fn choices(&self) -> Vec<String> {
        if let Some(schema) = &self.schema {
            if let Some(values) = schema.enum_values.as_ref().filter(|v| !v.is_empty()) {
                return values.clone();
            }
            if let Some(values) = schema.allowed_values.as_ref().filter(|v| !v.is_empty()) {
                return values.clone();
            }
        }

        let Some(choices) = self
            .meta
            .as_ref()
            .and_then(|meta| meta.options.as_ref())
            .and_then(|options| options.get("choices"))
            .and_then(Value::as_array)
        else {
            return vec![];
        };

        choices
            .iter()
            .filter_map(|choice| match choice {
                Value::String(value) => Some(value.clone()),
                Value::Object(choice) => choice
                    .get("value")
                    .and_then(Value::as_str)
                    .map(String::from),
                _ => None,
            })
            .collect()
    }
}
