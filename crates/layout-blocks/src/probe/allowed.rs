//! Strategies discovering the allowed content collections once the junction
//! is known. The first non-empty answer is kept.

use super::{Partial, Snapshot, Source, Strategy};

pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "field_metadata",
        needs: &[],
        apply: field_metadata,
    },
    Strategy {
        name: "touching_relations",
        needs: &[Source::Relations],
        apply: touching_relations,
    },
    Strategy {
        name: "item_relation",
        needs: &[Source::JunctionRelations],
        apply: item_relation,
    },
    Strategy {
        name: "collection_choices",
        needs: &[Source::JunctionFields],
        apply: collection_choices,
    },
];

fn field_metadata(snapshot: &Snapshot) -> Option<Partial> {
    let meta = snapshot.field_info.meta.as_ref()?;
    Partial::allowed(&meta.one_allowed_collections)
}

fn touching_relations(snapshot: &Snapshot) -> Option<Partial> {
    snapshot
        .relations()
        .iter()
        .find_map(|relation| Partial::allowed(relation.allowed_collections()))
}

/// The polymorphic relation on the junction's item column.
fn item_relation(snapshot: &Snapshot) -> Option<Partial> {
    let junction = snapshot.junction()?;
    let columns = junction.columns.as_ref()?;

    junction
        .relations()
        .iter()
        .filter(|r| r.collection == junction.collection && r.field == columns.item_field)
        .find_map(|r| Partial::allowed(r.allowed_collections()))
}

/// Choices declared on the junction's collection column.
fn collection_choices(snapshot: &Snapshot) -> Option<Partial> {
    let junction = snapshot.junction()?;
    let columns = junction.columns.as_ref()?;
    let field = junction.field(&columns.collection_field)?;

    Partial::allowed(&field.choices())
}
