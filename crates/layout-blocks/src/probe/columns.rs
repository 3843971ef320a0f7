use super::{Junction, Partial, Snapshot};

/// The junction's item and collection columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub item_field: String,
    pub collection_field: String,
}

/// Picks the item and collection columns of a junction candidate. `None`
/// when the candidate does not expose both; it is then not a blocks
/// junction.
pub fn resolve(junction: &Junction, partial: &Partial) -> Option<Columns> {
    let relation = junction.item_relation();

    let item_field = [
        relation.map(|r| r.field.as_str()),
        partial.item_field.as_deref(),
        Some("item"),
    ]
    .into_iter()
    .flatten()
    .find(|name| junction.has_field(name))?;

    let collection_field = [
        relation.and_then(|r| r.one_collection_field()),
        partial.collection_field.as_deref(),
        Some("collection"),
    ]
    .into_iter()
    .flatten()
    .find(|name| junction.has_field(name))?;

    Some(Columns {
        item_field: item_field.to_string(),
        collection_field: collection_field.to_string(),
    })
}

/// The junction column referencing the parent record.
pub fn foreign_key(snapshot: &Snapshot, junction: &Junction, partial: &Partial) -> String {
    if let Some(field) = &partial.foreign_key_field {
        return field.clone();
    }

    if let Some(field) = junction.item_relation().and_then(|r| r.junction_field()) {
        return field.to_string();
    }

    if let Some(relation) = junction.relations().iter().find(|r| {
        r.collection == junction.collection
            && r.related_collection.as_deref() == Some(&*snapshot.collection)
    }) {
        return relation.field.clone();
    }

    let parent = &snapshot.collection;
    let singular = pluralizer::pluralize(parent, 1, false);
    let guesses = [format!("{parent}_id"), format!("{singular}_id")];

    if let Some(guess) = guesses.iter().find(|g| junction.has_field(g)) {
        return guess.clone();
    }

    let item_field = junction.columns.as_ref().map(|c| c.item_field.as_str());
    junction
        .fields()
        .iter()
        .map(|f| f.field.as_str())
        .find(|name| name.ends_with("_id") && *name != "id" && Some(*name) != item_field)
        .map(String::from)
        .unwrap_or_else(|| guesses[0].clone())
}

pub fn primary_key(junction: &Junction) -> String {
    junction
        .fields()
        .iter()
        .find(|f| f.is_primary_key())
        .map(|f| f.field.clone())
        .unwrap_or_else(|| "id".to_string())
}
