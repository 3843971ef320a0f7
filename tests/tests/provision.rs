use layout_blocks::{
    driver::operation::Method,
    provision::{CreatedField, DataSummary, FieldKind},
    Options, Prober, Provisioner,
};
use layout_blocks_driver_memory::Fault;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{fixtures::*, Harness};

#[tokio::test]
async fn creates_missing_columns_and_backfills() {
    let host = bare_host();
    for title in ["One", "Two"] {
        let item = text(&host, title);
        host.insert(
            JUNCTION,
            json!({ "page_id": 1, "item": item.to_value(), "collection": TEXT }),
        )
        .unwrap();
    }
    let harness = Harness::new(host);

    let mut blocks = harness.try_open(&harness.builder()).await.unwrap();

    let setup = blocks.setup_result().unwrap();
    assert!(setup.is_success());
    assert_eq!(
        setup.created,
        [
            CreatedField {
                field: "area".to_string(),
                kind: FieldKind::Area,
            },
            CreatedField {
                field: "sort".to_string(),
                kind: FieldKind::Sort,
            },
        ]
    );
    assert_eq!(blocks.descriptor().area_field(), Some("area"));
    assert_eq!(blocks.descriptor().sort_field(), Some("sort"));

    assert_eq!(
        junction_rows(&harness.host),
        [
            (json!(1), json!("main"), json!(0)),
            (json!(2), json!("main"), json!(1)),
        ]
    );

    blocks.load(1).await.unwrap();
    let titles: Vec<_> = blocks.blocks().iter().map(|b| b.title()).collect();
    assert_eq!(titles, ["One", "Two"]);
}

#[tokio::test]
async fn created_area_column_is_hidden_with_default() {
    let harness = Harness::new(bare_host());

    harness.try_open(&harness.builder()).await.unwrap();

    let area = harness.host.field(JUNCTION, "area").unwrap();
    assert_eq!(area.ty, "string");
    assert!(area.is_hidden());
    assert_eq!(
        area.schema.and_then(|s| s.default_value),
        Some(json!("main"))
    );

    let sort = harness.host.field(JUNCTION, "sort").unwrap();
    assert_eq!(sort.ty, "integer");
    assert!(sort.is_hidden());
}

#[tokio::test]
async fn existing_columns_are_left_alone() {
    let harness = Harness::new(host());

    let blocks = harness.try_open(&harness.builder()).await.unwrap();

    let setup = blocks.setup_result().unwrap();
    assert!(setup.created.is_empty());
    assert!(setup.is_success());
    assert_eq!(harness.log.count_method(Method::Post), 0);
    assert_eq!(harness.log.count_method(Method::Patch), 0);
}

#[tokio::test]
async fn incompatible_sort_uses_fallback_name() {
    let host = bare_host();
    host.add_field(column(JUNCTION, "area", "string"))
        .add_field(column(JUNCTION, "sort", "string"));
    let harness = Harness::new(host);

    let blocks = harness.try_open(&harness.builder()).await.unwrap();

    let setup = blocks.setup_result().unwrap();
    assert!(setup.is_success());
    assert_eq!(
        setup.created,
        [CreatedField {
            field: "sort_order".to_string(),
            kind: FieldKind::Sort,
        }]
    );
    assert_eq!(blocks.descriptor().area_field(), Some("area"));
    assert_eq!(blocks.descriptor().sort_field(), Some("sort_order"));
    assert_eq!(blocks.descriptor().load_sort(), ["area", "sort_order"]);
}

#[tokio::test]
async fn conflicting_fallback_is_reported() {
    let host = bare_host();
    host.add_field(column(JUNCTION, "area", "string"))
        .add_field(column(JUNCTION, "sort", "string"))
        .add_field(column(JUNCTION, "sort_order", "json"));
    let harness = Harness::new(host);

    let blocks = harness.try_open(&harness.builder()).await.unwrap();

    let setup = blocks.setup_result().unwrap();
    assert!(setup.created.is_empty());
    assert_eq!(setup.errors.len(), 1);
    assert!(setup.errors[0].is_validation());
    assert!(setup.errors[0].to_string().contains("field conflict"));
    assert_eq!(harness.log.count_method(Method::Post), 0);
}

#[tokio::test]
async fn failed_creation_is_collected() {
    let host = bare_host();
    host.inject(
        Fault::status(403, "You don't have permission to access this.")
            .on(Method::Post)
            .path("/fields"),
    );
    let harness = Harness::new(host);

    let blocks = harness.try_open(&harness.builder()).await.unwrap();

    let setup = blocks.setup_result().unwrap();
    assert!(setup.created.is_empty());
    assert_eq!(setup.errors.len(), 2);
    assert_eq!(setup.errors[0].status(), Some(403));
    assert_eq!(blocks.descriptor().area_field(), None);
    assert_eq!(blocks.descriptor().sort_field(), None);
}

#[tokio::test]
async fn already_existing_column_is_adopted() {
    let host = bare_host();
    host.inject(
        Fault::status(400, "Field \"area\" already exists in collection \"page_blocks\"")
            .on(Method::Post)
            .path("/fields")
            .times(1),
    );
    let harness = Harness::new(host);

    let blocks = harness.try_open(&harness.builder()).await.unwrap();

    let setup = blocks.setup_result().unwrap();
    assert!(setup.is_success());
    assert_eq!(setup.created.len(), 1);
    assert_eq!(blocks.descriptor().area_field(), Some("area"));
    assert_eq!(blocks.descriptor().sort_field(), Some("sort"));
}

#[tokio::test]
async fn auto_setup_disabled() {
    let harness = Harness::new(bare_host());
    let mut builder = harness.builder();
    builder.options(Options::new().auto_setup(false));

    let blocks = harness.try_open(&builder).await.unwrap();

    assert!(blocks.setup_result().is_none());
    assert_eq!(blocks.descriptor().area_field(), None);
    assert_eq!(blocks.descriptor().load_sort(), ["id"]);
    assert_eq!(harness.log.writes(), 0);
}

#[tokio::test]
async fn validate_setup_lists_issues() {
    let options = Options::default();

    let harness = Harness::new(bare_host());
    let descriptor = Prober::new(harness.client(), &options)
        .probe(PARENT, FIELD)
        .await
        .unwrap();
    let issues = Provisioner::new(harness.client())
        .validate_setup(&descriptor, &options)
        .await;
    assert_eq!(
        issues,
        ["area field `area` not found", "sort field `sort` not found"]
    );

    let host = bare_host();
    host.add_field(column(JUNCTION, "area", "integer"))
        .add_field(column(JUNCTION, "sort", "integer"));
    let harness = Harness::new(host);
    let descriptor = Prober::new(harness.client(), &options)
        .probe(PARENT, FIELD)
        .await
        .unwrap();
    let issues = Provisioner::new(harness.client())
        .validate_setup(&descriptor, &options)
        .await;
    assert_eq!(issues, ["area field `area` is not a string type"]);
}

#[tokio::test]
async fn analyze_existing_data() {
    let host = host();
    text_blocks(&host, "main", &["One", "Two"]);
    text_blocks(&host, "sidebar", &["Aside"]);
    let harness = Harness::new(host);

    let options = Options::default();
    let descriptor = Prober::new(harness.client(), &options)
        .probe(PARENT, FIELD)
        .await
        .unwrap();
    let summary = Provisioner::new(harness.client())
        .analyze_existing_data(&descriptor)
        .await
        .unwrap();

    assert_eq!(
        summary,
        DataSummary {
            total_count: 3,
            has_area_values: true,
            has_sort_values: true,
            unique_areas: vec!["main".to_string(), "sidebar".to_string()],
        }
    );
}
