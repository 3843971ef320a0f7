use super::{Snapshot, Source};

/// One way of inferring part of the junction shape.
///
/// Strategies are pure: `apply` only looks at the snapshot. The prober makes
/// sure every source listed in `needs` is loaded before calling it.
#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub needs: &'static [Source],
    pub apply: fn(&Snapshot) -> Option<Partial>,
}

/// What a strategy found. Unset attributes are left for later strategies or
/// for the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partial {
    pub junction_collection: Option<String>,
    pub foreign_key_field: Option<String>,
    pub item_field: Option<String>,
    pub collection_field: Option<String>,
    pub allowed_collections: Vec<String>,
}

impl Partial {
    pub fn junction(collection: impl Into<String>) -> Partial {
        Partial {
            junction_collection: Some(collection.into()),
            ..Partial::default()
        }
    }

    pub fn allowed(collections: &[String]) -> Option<Partial> {
        if collections.is_empty() {
            return None;
        }

        Some(Partial {
            allowed_collections: collections.to_vec(),
            ..Partial::default()
        })
    }

    /// Fills attributes still unset in `self` from `other`. Values already
    /// found are never replaced.
    pub fn merge(&mut self, other: Partial) {
        fn fill(slot: &mut Option<String>, value: Option<String>) {
            if slot.is_none() {
                *slot = value;
            }
        }

        fill(&mut self.junction_collection, other.junction_collection);
        fill(&mut self.foreign_key_field, other.foreign_key_field);
        fill(&mut self.item_field, other.item_field);
        fill(&mut self.collection_field, other.collection_field);

        if self.allowed_collections.is_empty() {
            self.allowed_collections = other.allowed_collections;
        }
    }
}
