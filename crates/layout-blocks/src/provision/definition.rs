use serde_json::{json, Value};

/// The two columns the provisioner manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Area,
    Sort,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Area => "area",
            FieldKind::Sort => "sort",
        }
    }

    /// Name tried when `name` is taken by an incompatible column.
    pub fn fallback_name(self, name: &str) -> String {
        match self {
            FieldKind::Area => format!("{name}_layout"),
            FieldKind::Sort => format!("{name}_order"),
        }
    }

    /// Whether a column of host type `ty` can serve as this kind of column.
    pub fn accepts(self, ty: &str) -> bool {
        match self {
            FieldKind::Area => matches!(ty, "string" | "varchar" | "text"),
            FieldKind::Sort => crate::SortStorage::from_type(ty).is_some(),
        }
    }

    /// Field creation payload for a hidden column named `name` on `collection`.
    pub fn definition(self, collection: &str, name: &str, default_area: &str) -> Value {
        match self {
            FieldKind::Area => json!({
                "field": name,
                "type": "string",
                "meta": {
                    "interface": "input",
                    "display": "raw",
                    "hidden": true,
                    "readonly": false,
                    "sort": 1000
                },
                "schema": {
                    "name": name,
                    "table": collection,
                    "data_type": "varchar",
                    "max_length": 64,
                    "default_value": default_area,
                    "is_nullable": false,
                    "is_unique": false
                }
            }),
            FieldKind::Sort => json!({
                "field": name,
                "type": "integer",
                "meta": {
                    "interface": "input",
                    "display": "raw",
                    "hidden": true,
                    "readonly": false,
                    "sort": 1001
                },
                "schema": {
                    "name": name,
                    "table": collection,
                    "data_type": "integer",
                    "default_value": 0,
                    "is_nullable": false,
                    "is_unique": false
                }
            }),
        }
    }
}

impl core::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
