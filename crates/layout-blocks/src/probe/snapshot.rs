use super::Columns;

use layout_blocks_core::schema::{Collection, Field, Relation};

/// Metadata a strategy may need beyond the field itself. The prober loads
/// each source at most once, and only when a strategy asks for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Relations touching `(parent, field)` in either direction.
    Relations,

    /// Every collection known to the host.
    Collections,

    /// Fields of the candidate junction.
    JunctionFields,

    /// Relations declared on the candidate junction.
    JunctionRelations,
}

/// Everything fetched so far while probing one field.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub collection: String,
    pub field: String,
    pub field_info: Field,
    pub relations: Option<Vec<Relation>>,
    pub collections: Option<Vec<Collection>>,
    pub junction: Option<Junction>,
}

/// The junction candidate under consideration.
#[derive(Debug, Clone)]
pub struct Junction {
    pub collection: String,
    pub fields: Option<Vec<Field>>,
    pub relations: Option<Vec<Relation>>,

    /// Item and collection columns, once the candidate has been validated.
    pub columns: Option<Columns>,
}

impl Snapshot {
    pub fn new(collection: &str, field: &str, field_info: Field) -> Snapshot {
        Snapshot {
            collection: collection.to_string(),
            field: field.to_string(),
            field_info,
            relations: None,
            collections: None,
            junction: None,
        }
    }

    pub fn has(&self, source: Source) -> bool {
        match source {
            Source::Relations => self.relations.is_some(),
            Source::Collections => self.collections.is_some(),
            Source::JunctionFields => self.junction().is_some_and(|j| j.fields.is_some()),
            Source::JunctionRelations => self.junction().is_some_and(|j| j.relations.is_some()),
        }
    }

    pub fn relations(&self) -> &[Relation] {
        self.relations.as_deref().unwrap_or_default()
    }

    pub fn collections(&self) -> &[Collection] {
        self.collections.as_deref().unwrap_or_default()
    }

    pub fn junction(&self) -> Option<&Junction> {
        self.junction.as_ref()
    }

    pub fn collection_exists(&self, name: &str) -> bool {
        self.collections()
            .iter()
            .any(|c| c.collection == name && !c.is_folder())
    }
}

impl Junction {
    pub fn new(collection: impl Into<String>) -> Junction {
        Junction {
            collection: collection.into(),
            fields: None,
            relations: None,
            columns: None,
        }
    }

    pub fn fields(&self) -> &[Field] {
        self.fields.as_deref().unwrap_or_default()
    }

    pub fn relations(&self) -> &[Relation] {
        self.relations.as_deref().unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.field == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// The relation describing the polymorphic item column, if declared.
    pub fn item_relation(&self) -> Option<&Relation> {
        self.relations()
            .iter()
            .find(|r| r.collection == self.collection && r.is_polymorphic())
    }
}
