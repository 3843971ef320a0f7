use super::AreaConfig;

use serde::Deserialize;

/// Interface options for one blocks field.
///
/// Deserializes from the host's camel-cased interface options; every key is
/// optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Name of the junction column holding the area id.
    pub area_field: String,

    /// Name of the junction column holding the rank within an area.
    pub sort_field: String,

    /// Area assigned to rows without one.
    pub default_area: String,

    pub areas: Vec<AreaConfig>,

    /// Create missing area and sort columns on open.
    pub auto_setup: bool,

    /// Delete the content item together with the junction row on `remove`.
    pub delete_items: bool,

    /// Further restricts the collections discovered on the junction. Empty
    /// means no extra restriction.
    pub allowed_collections: Vec<String>,

    pub max_items_per_area: Option<usize>,

    pub max_total_blocks: Option<usize>,
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn area_field(mut self, name: impl Into<String>) -> Options {
        self.area_field = name.into();
        self
    }

    pub fn sort_field(mut self, name: impl Into<String>) -> Options {
        self.sort_field = name.into();
        self
    }

    pub fn default_area(mut self, area: impl Into<String>) -> Options {
        self.default_area = area.into();
        self
    }

    pub fn areas(mut self, areas: impl IntoIterator<Item = AreaConfig>) -> Options {
        self.areas = areas.into_iter().collect();
        self
    }

    pub fn auto_setup(mut self, enabled: bool) -> Options {
        self.auto_setup = enabled;
        self
    }

    pub fn delete_items(mut self, enabled: bool) -> Options {
        self.delete_items = enabled;
        self
    }

    pub fn allowed_collections<I, S>(mut self, collections: I) -> Options
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_collections = collections.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_items_per_area(mut self, max: usize) -> Options {
        self.max_items_per_area = Some(max);
        self
    }

    pub fn max_total_blocks(mut self, max: usize) -> Options {
        self.max_total_blocks = Some(max);
        self
    }

    /// The configuration of `area`, if it is configured.
    pub fn area(&self, area: &str) -> Option<&AreaConfig> {
        self.areas.iter().find(|config| config.id == area)
    }

    pub fn allows_collection(&self, collection: &str) -> bool {
        self.allowed_collections.is_empty()
            || self.allowed_collections.iter().any(|c| c == collection)
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            area_field: "area".to_string(),
            sort_field: "sort".to_string(),
            default_area: "main".to_string(),
            areas: vec![AreaConfig::new("main", "Main Content").default_area()],
            auto_setup: true,
            delete_items: false,
            allowed_collections: vec![],
            max_items_per_area: None,
            max_total_blocks: None,
        }
    }
}
