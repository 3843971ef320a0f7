use layout_blocks::{DescriptorCache, Options, Prober, SortStorage};
use layout_blocks_core::schema::{Field, FieldMeta, FieldSchema, Relation, RelationMeta};
use layout_blocks_driver_memory::Memory;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{fixtures::*, Harness};

fn prober(harness: &Harness) -> Prober {
    Prober::new(harness.client(), &Options::default())
}

/// Parent, content collections, and the junction columns, without any
/// relation records.
fn host_without_relations() -> Memory {
    let host = Memory::new();
    host.add_field(m2a_field(PARENT, FIELD))
        .add_collection(TEXT)
        .add_collection(JUNCTION)
        .add_field(column(JUNCTION, "page_id", "integer"))
        .add_field(column(JUNCTION, "item", "string"))
        .add_field(column(JUNCTION, "collection", "string"))
        .add_field(column(JUNCTION, "area", "string"))
        .add_field(column(JUNCTION, "sort", "integer"));
    host
}

#[tokio::test]
async fn probes_standard_junction() {
    let harness = Harness::new(host());

    let descriptor = prober(&harness).probe(PARENT, FIELD).await.unwrap();

    assert_eq!(descriptor.junction_collection, JUNCTION);
    assert_eq!(descriptor.primary_key_field, "id");
    assert_eq!(descriptor.foreign_key_field, "page_id");
    assert_eq!(descriptor.item_field, "item");
    assert_eq!(descriptor.collection_field, "collection");
    assert!(descriptor.has_area_field);
    assert!(descriptor.has_sort_field);
    assert_eq!(descriptor.sort_storage, SortStorage::Integer);
    assert_eq!(
        descriptor.allowed_collections.iter().collect::<Vec<_>>(),
        [TEXT, HERO]
    );
    assert_eq!(
        descriptor.junction_fields,
        ["id", "page_id", "item", "collection", "area", "sort"]
    );

    assert_eq!(
        harness.log.requests(),
        [
            "GET /fields/pages/blocks",
            "GET /relations",
            "GET /fields/page_blocks",
            "GET /relations",
        ]
    );
}

#[tokio::test]
async fn non_m2a_field_fails_after_one_request() {
    let harness = Harness::new(host());

    let err = prober(&harness).probe(PARENT, "title").await.unwrap_err();

    assert!(err.is_schema());
    assert_eq!(err.collection(), Some(PARENT));
    assert_eq!(err.field(), Some("title"));
    assert_eq!(
        err.to_string(),
        "invalid block schema for pages.title: not a many-to-any field (type `string`, special [])"
    );
    assert_eq!(harness.log.len(), 1);
}

#[tokio::test]
async fn missing_field() {
    let harness = Harness::new(host());

    let err = prober(&harness).probe(PARENT, "sections").await.unwrap_err();

    assert!(err.is_schema());
    assert_eq!(
        err.to_string(),
        "invalid block schema for pages.sections: field does not exist"
    );
}

#[tokio::test]
async fn junction_named_in_field_metadata() {
    let host = host_without_relations();
    let mut field = m2a_field(PARENT, FIELD);
    if let Some(meta) = field.meta.as_mut() {
        meta.junction_collection = Some(JUNCTION.to_string());
        meta.junction_field = Some("page_id".to_string());
        meta.one_allowed_collections = vec![TEXT.to_string()];
    }
    host.add_field(field);
    let harness = Harness::new(host);

    let descriptor = prober(&harness).probe(PARENT, FIELD).await.unwrap();

    assert_eq!(descriptor.junction_collection, JUNCTION);
    assert_eq!(descriptor.foreign_key_field, "page_id");
    assert!(descriptor.allows(TEXT));
    assert!(!descriptor.allows(HERO));
    assert_eq!(
        harness.log.requests(),
        ["GET /fields/pages/blocks", "GET /fields/page_blocks"]
    );
}

#[tokio::test]
async fn naming_convention_with_collection_choices() {
    let host = host_without_relations();
    let mut collection = column(JUNCTION, "collection", "string");
    collection.meta = Some(FieldMeta {
        options: Some(json!({ "choices": [{ "text": "Text", "value": TEXT }] })),
        ..FieldMeta::default()
    });
    host.add_field(collection);
    let harness = Harness::new(host);

    let descriptor = prober(&harness).probe(PARENT, FIELD).await.unwrap();

    assert_eq!(descriptor.junction_collection, JUNCTION);
    assert_eq!(descriptor.foreign_key_field, "page_id");
    assert_eq!(
        descriptor.allowed_collections.iter().collect::<Vec<_>>(),
        [TEXT]
    );
    assert_eq!(descriptor.load_fields(), ["*", "item:content_text.*"]);
}

#[tokio::test]
async fn candidate_without_collection_column_is_skipped() {
    let host = host();
    host.add_collection("page_blocks_legacy")
        .add_field(column("page_blocks_legacy", "page_id", "integer"))
        .add_field(column("page_blocks_legacy", "item", "string"));

    let mut field = m2a_field(PARENT, FIELD);
    if let Some(meta) = field.meta.as_mut() {
        meta.junction_collection = Some("page_blocks_legacy".to_string());
    }
    host.add_field(field);
    let harness = Harness::new(host);

    let descriptor = prober(&harness).probe(PARENT, FIELD).await.unwrap();

    assert_eq!(descriptor.junction_collection, JUNCTION);
    assert_eq!(descriptor.foreign_key_field, "page_id");
}

#[tokio::test]
async fn naming_convention_tries_every_guess() {
    let host = host_without_relations();
    host.add_collection("pages_blocks")
        .add_field(column("pages_blocks", "note", "string"));
    let harness = Harness::new(host);

    let descriptor = prober(&harness).probe(PARENT, FIELD).await.unwrap();

    assert_eq!(descriptor.junction_collection, JUNCTION);
    assert_eq!(descriptor.item_field, "item");
    assert_eq!(descriptor.collection_field, "collection");
    assert!(harness
        .log
        .requests()
        .contains(&"GET /fields/pages_blocks".to_string()));
}

#[tokio::test]
async fn sort_storage_follows_column_type() {
    let host = host();
    let mut sort = column(JUNCTION, "sort", "float");
    sort.schema = Some(FieldSchema {
        data_type: Some("real".to_string()),
        ..FieldSchema::default()
    });
    host.add_field(sort);
    let harness = Harness::new(host);

    let descriptor = prober(&harness).probe(PARENT, FIELD).await.unwrap();
    assert_eq!(descriptor.sort_storage, SortStorage::Fractional);
}

#[tokio::test]
async fn no_junction_found() {
    let host = Memory::new();
    host.add_field(m2a_field(PARENT, FIELD))
        .add_relation(Relation {
            collection: "unrelated".to_string(),
            field: "owner".to_string(),
            related_collection: Some("users".to_string()),
            meta: Some(RelationMeta::default()),
        });
    let harness = Harness::new(host);

    let err = prober(&harness).probe(PARENT, FIELD).await.unwrap_err();

    assert!(err.is_schema());
    assert!(err.to_string().contains("\"Many to Any\""), "{err}");
}

#[tokio::test]
async fn cache_probes_once() {
    let harness = Harness::new(host());
    let cache = DescriptorCache::new();
    let prober = prober(&harness);

    let first = cache.get_or_probe(&prober, PARENT, FIELD).await.unwrap();
    let requests = harness.log.len();
    let second = cache.get_or_probe(&prober, PARENT, FIELD).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(harness.log.len(), requests);

    cache.invalidate(PARENT, FIELD);
    cache.get_or_probe(&prober, PARENT, FIELD).await.unwrap();
    assert_eq!(harness.log.len(), requests * 2);
}

#[tokio::test]
async fn field_record_round_trips_through_host() {
    let harness = Harness::new(host());

    let field: Option<Field> = harness.client().field(JUNCTION, "sort").await.unwrap();
    assert_eq!(field.and_then(|f| f.storage_type().map(String::from)).as_deref(), Some("integer"));
    assert_eq!(harness.client().field(JUNCTION, "missing").await.unwrap(), None);
}
