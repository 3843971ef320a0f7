use serde::{Deserialize, Serialize};

/// A named region of the layout. Read-only configuration; only used to
/// validate where blocks may be placed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaConfig {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub width: Option<String>,
    pub max_items: Option<usize>,
    pub min_items: Option<usize>,

    /// Collections accepted in this area. Empty accepts any.
    pub allowed_types: Vec<String>,

    /// A locked area accepts no new blocks and releases none.
    pub locked: bool,
    pub hidden: bool,
    pub default: bool,
}

impl AreaConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> AreaConfig {
        AreaConfig {
            id: id.into(),
            label: label.into(),
            ..AreaConfig::default()
        }
    }

    pub fn max_items(mut self, max: usize) -> AreaConfig {
        self.max_items = Some(max);
        self
    }

    pub fn min_items(mut self, min: usize) -> AreaConfig {
        self.min_items = Some(min);
        self
    }

    pub fn allowed_types<I, S>(mut self, collections: I) -> AreaConfig
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = collections.into_iter().map(Into::into).collect();
        self
    }

    pub fn locked(mut self) -> AreaConfig {
        self.locked = true;
        self
    }

    pub fn default_area(mut self) -> AreaConfig {
        self.default = true;
        self
    }

    pub fn accepts(&self, collection: &str) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.iter().any(|c| c == collection)
    }
}
