//! Strategies locating the junction collection, in the order they are tried.

use super::{Partial, Snapshot, Source};

/// A strategy proposing junction candidates, best first. The prober checks
/// each candidate's columns and takes the first one that fits.
#[derive(Debug, Clone, Copy)]
pub struct Locator {
    pub name: &'static str,
    pub needs: &'static [Source],
    pub apply: fn(&Snapshot) -> Vec<Partial>,
}

pub const STRATEGIES: &[Locator] = &[
    Locator {
        name: "field_metadata",
        needs: &[],
        apply: field_metadata,
    },
    Locator {
        name: "one_side_relation",
        needs: &[Source::Relations],
        apply: one_side_relation,
    },
    Locator {
        name: "direct_relation",
        needs: &[Source::Relations],
        apply: direct_relation,
    },
    Locator {
        name: "naming_convention",
        needs: &[Source::Collections],
        apply: naming_convention,
    },
];

/// The field's own metadata names the junction.
fn field_metadata(snapshot: &Snapshot) -> Vec<Partial> {
    let Some(meta) = snapshot.field_info.meta.as_ref() else {
        return vec![];
    };
    let Some(junction) = meta.junction_collection.clone() else {
        return vec![];
    };

    vec![Partial {
        junction_collection: Some(junction),
        foreign_key_field: meta.junction_field.clone(),
        collection_field: meta.one_collection_field.clone(),
        allowed_collections: meta.one_allowed_collections.clone(),
        ..Partial::default()
    }]
}

/// The relation from the junction back to the parent, whose one-side field
/// is the blocks field.
fn one_side_relation(snapshot: &Snapshot) -> Vec<Partial> {
    snapshot
        .relations()
        .iter()
        .filter(|r| {
            r.one_field() == Some(&*snapshot.field)
                && r.related_collection
                    .as_deref()
                    .map_or(true, |related| related == snapshot.collection)
        })
        .map(|relation| Partial {
            junction_collection: Some(relation.collection.clone()),
            foreign_key_field: Some(relation.field.clone()),
            item_field: relation.junction_field().map(String::from),
            allowed_collections: relation.allowed_collections().to_vec(),
            ..Partial::default()
        })
        .collect()
}

/// A relation declared on the blocks field itself that names its junction.
fn direct_relation(snapshot: &Snapshot) -> Vec<Partial> {
    snapshot
        .relations()
        .iter()
        .filter(|r| r.collection == snapshot.collection && r.field == snapshot.field)
        .filter_map(|relation| {
            let junction = relation
                .meta
                .as_ref()
                .and_then(|meta| meta.junction_collection.clone())
                .or_else(|| {
                    relation
                        .has_special("m2a")
                        .then(|| relation.related_collection.clone())
                        .flatten()
                })?;

            Some(Partial {
                junction_collection: Some(junction),
                collection_field: relation.one_collection_field().map(String::from),
                allowed_collections: relation.allowed_collections().to_vec(),
                ..Partial::default()
            })
        })
        .collect()
}

/// Guess the junction from the host's naming convention. Every name of an
/// existing collection is returned, in candidate order.
fn naming_convention(snapshot: &Snapshot) -> Vec<Partial> {
    candidate_names(&snapshot.collection, &snapshot.field)
        .into_iter()
        .filter(|name| snapshot.collection_exists(name))
        .map(Partial::junction)
        .collect()
}

/// `{parent}_{field}`, then with the parent de-pluralized, then with the
/// parent's underscores dropped.
pub fn candidate_names(parent: &str, field: &str) -> Vec<String> {
    let singular = pluralizer::pluralize(parent, 1, false);
    let compact = parent.replace('_', "");

    let mut names = vec![format!("{parent}_{field}")];
    for base in [singular, compact] {
        let name = format!("{base}_{field}");
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
