use indexmap::IndexSet;

/// How the junction's sort column stores ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortStorage {
    /// Whole numbers only. A fractional rank cannot be written.
    #[default]
    Integer,

    /// Floating point or decimal ranks.
    Fractional,
}

impl SortStorage {
    /// Classifies a host storage type, `None` when the type cannot hold a
    /// rank at all.
    pub fn from_type(ty: &str) -> Option<SortStorage> {
        match ty {
            "integer" | "int" | "bigint" | "bigInteger" | "smallint" => Some(SortStorage::Integer),
            "float" | "decimal" | "double" | "real" => Some(SortStorage::Fractional),
            _ => None,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, SortStorage::Integer)
    }
}

/// Everything needed to read and write the blocks of one
/// `(parent collection, field)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionDescriptor {
    pub parent_collection: String,
    pub field: String,

    /// The junction table.
    pub junction_collection: String,

    pub primary_key_field: String,

    /// Junction column referencing the parent record.
    pub foreign_key_field: String,

    /// Junction column referencing the content item.
    pub item_field: String,

    /// Junction column naming the content item's collection.
    pub collection_field: String,

    pub area_field: String,
    pub has_area_field: bool,

    pub sort_field: String,
    pub has_sort_field: bool,
    pub sort_storage: SortStorage,

    /// Content collections a block may come from. Empty is unrestricted.
    pub allowed_collections: IndexSet<String>,

    /// Every column name the junction exposed when it was probed.
    pub junction_fields: Vec<String>,
}

impl JunctionDescriptor {
    /// A descriptor using the conventional column names.
    pub fn new(
        parent_collection: impl Into<String>,
        field: impl Into<String>,
        junction_collection: impl Into<String>,
    ) -> JunctionDescriptor {
        let parent_collection = parent_collection.into();
        JunctionDescriptor {
            foreign_key_field: format!("{parent_collection}_id"),
            parent_collection,
            field: field.into(),
            junction_collection: junction_collection.into(),
            primary_key_field: "id".to_string(),
            item_field: "item".to_string(),
            collection_field: "collection".to_string(),
            area_field: "area".to_string(),
            has_area_field: false,
            sort_field: "sort".to_string(),
            has_sort_field: false,
            sort_storage: SortStorage::Integer,
            allowed_collections: IndexSet::new(),
            junction_fields: vec![],
        }
    }

    /// The area column, when the junction has one.
    pub fn area_field(&self) -> Option<&str> {
        self.has_area_field.then_some(&*self.area_field)
    }

    /// The sort column, when the junction has one.
    pub fn sort_field(&self) -> Option<&str> {
        self.has_sort_field.then_some(&*self.sort_field)
    }

    pub fn allows(&self, collection: &str) -> bool {
        self.allowed_collections.is_empty() || self.allowed_collections.contains(collection)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.junction_fields.iter().any(|field| field == name)
    }

    /// Ordering used when loading blocks.
    pub fn load_sort(&self) -> Vec<String> {
        match (self.area_field(), self.sort_field()) {
            (Some(area), Some(sort)) => vec![area.to_string(), sort.to_string()],
            (None, Some(sort)) => vec![sort.to_string()],
            _ => vec![self.primary_key_field.clone()],
        }
    }

    /// Field selection used when loading blocks: every junction column plus
    /// the expanded content item.
    pub fn load_fields(&self) -> Vec<String> {
        let mut fields = vec!["*".to_string()];

        if self.allowed_collections.is_empty() {
            fields.push(format!("{}.*", self.item_field));
        } else {
            fields.extend(
                self.allowed_collections
                    .iter()
                    .map(|collection| format!("{}:{collection}.*", self.item_field)),
            );
        }

        fields
    }

    pub(crate) fn with_area_field(mut self, name: &str) -> JunctionDescriptor {
        self.area_field = name.to_string();
        self.has_area_field = true;
        self.record_column(name);
        self
    }

    pub(crate) fn with_sort_field(mut self, name: &str, storage: SortStorage) -> JunctionDescriptor {
        self.sort_field = name.to_string();
        self.has_sort_field = true;
        self.sort_storage = storage;
        self.record_column(name);
        self
    }

    fn record_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.junction_fields.push(name.to_string());
        }
    }
}
