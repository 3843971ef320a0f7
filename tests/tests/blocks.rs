use layout_blocks::{
    driver::operation::Method, engine::WarningKind, AreaConfig, ItemId, Options,
};
use layout_blocks_driver_memory::Fault;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{fixtures::*, Harness};

fn titles(blocks: &layout_blocks::Blocks, area: &str) -> Vec<String> {
    blocks
        .get_blocks_for_area(area)
        .into_iter()
        .map(|b| b.title())
        .collect()
}

#[tokio::test]
async fn link_writes_junction_row() {
    let host = host();
    host.insert(TEXT, json!({ "id": 7, "title": "Seven" })).unwrap();
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    let block = blocks.link("main", TEXT, 7).await.unwrap();

    assert_eq!(
        harness.log.created(JUNCTION),
        [json!({
            "page_id": 1,
            "item": 7,
            "collection": "content_text",
            "area": "main",
            "sort": 0,
        })]
    );
    assert_eq!(
        harness.log.requests(),
        ["POST /items/page_blocks", "GET /items/content_text/7"]
    );
    assert_eq!(block.area, "main");
    assert_eq!(block.sort, 0.0);
    assert_eq!(block.item_id, Some(ItemId::Int(7)));
    assert_eq!(block.title(), "Seven");
    assert_eq!(blocks.blocks().len(), 1);
}

#[tokio::test]
async fn load_orders_by_area_and_rank() {
    let host = host();
    text_blocks(&host, "main", &["A", "B"]);
    text_blocks(&host, "sidebar", &["Aside"]);
    let hero = host.insert(HERO, json!({ "headline": "Welcome" })).unwrap();
    block(&host, 1, "main", -1, HERO, &hero);
    let other = text(&host, "Other page");
    block(&host, 2, "main", 0, TEXT, &other);
    let harness = Harness::new(host);

    let blocks = harness.open(Options::default()).await;

    assert_eq!(blocks.blocks().len(), 4);
    assert_eq!(titles(&blocks, "main"), ["Welcome", "A", "B"]);
    assert_eq!(titles(&blocks, "sidebar"), ["Aside"]);
    assert!(titles(&blocks, "footer").is_empty());

    let hero = &blocks.get_blocks_for_area("main")[0];
    assert_eq!(hero.collection, HERO);
    assert_eq!(hero.item["headline"], "Welcome");
}

#[tokio::test]
async fn rows_without_area_land_in_default_area() {
    let host = host();
    let item = text(&host, "Loose");
    host.insert(
        JUNCTION,
        json!({ "page_id": 1, "item": item.to_value(), "collection": TEXT, "sort": 0 }),
    )
    .unwrap();
    let harness = Harness::new(host);

    let blocks = harness.open(Options::default()).await;

    assert_eq!(titles(&blocks, "main"), ["Loose"]);
}

#[tokio::test]
async fn rows_without_collection_are_skipped() {
    let host = host();
    text_blocks(&host, "main", &["A"]);
    let stray = text(&host, "Stray");
    host.insert(
        JUNCTION,
        json!({ "page_id": 1, "item": stray.to_value(), "collection": null, "area": "main", "sort": 1 }),
    )
    .unwrap();
    host.insert(
        JUNCTION,
        json!({ "page_id": 1, "item": stray.to_value(), "collection": "", "area": "main", "sort": 2 }),
    )
    .unwrap();
    text_blocks(&host, "sidebar", &["B"]);
    let harness = Harness::new(host);

    let blocks = harness.open(Options::default()).await;

    assert!(blocks.error().is_none());
    assert_eq!(titles(&blocks, "main"), ["A"]);
    assert_eq!(titles(&blocks, "sidebar"), ["B"]);
}

#[tokio::test]
async fn unsaved_parent_has_no_blocks() {
    let host = host();
    text_blocks(&host, "main", &["A"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.load("+").await.unwrap();

    assert!(blocks.blocks().is_empty());
    assert!(harness.log.is_empty());

    let err = blocks
        .create("main", TEXT, json!({ "title": "New" }))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(harness.log.is_empty());
}

#[tokio::test]
async fn failed_load_clears_blocks_and_keeps_error() {
    let host = host();
    text_blocks(&host, "main", &["A"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;
    assert_eq!(blocks.blocks().len(), 1);

    harness
        .host
        .inject(Fault::status(500, "boom").path("/items/page_blocks"));
    let err = blocks.reload().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().starts_with("loading blocks of pages.blocks"));
    assert!(blocks.blocks().is_empty());
    assert_eq!(blocks.error().and_then(|e| e.status()), Some(500));
    assert!(!blocks.is_loading());
}

#[tokio::test]
async fn create_appends_to_area() {
    let host = host();
    text_blocks(&host, "main", &["A"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    let block = blocks
        .create("main", TEXT, json!({ "title": "Hello" }))
        .await
        .unwrap();

    assert_eq!(
        harness.log.requests(),
        ["POST /items/content_text", "POST /items/page_blocks"]
    );
    assert_eq!(block.sort, 1.0);
    assert_eq!(block.item["title"], "Hello");
    assert_eq!(titles(&blocks, "main"), ["A", "Hello"]);

    let row = harness.host.item(JUNCTION, block.id.clone()).unwrap();
    assert_eq!(row["collection"], TEXT);
    assert_eq!(row["area"], "main");
    assert_eq!(row["sort"], 1);
}

#[tokio::test]
async fn update_merges_item_fields() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks
        .update(&ids[0], json!({ "title": "Renamed" }))
        .await
        .unwrap();

    assert_eq!(harness.log.requests(), ["PATCH /items/content_text/1"]);
    let block = blocks.block(&ids[0]).unwrap();
    assert_eq!(block.title(), "Renamed");
    assert_eq!(block.item["body"], "");
    assert_eq!(harness.host.item(TEXT, 1).unwrap()["title"], "Renamed");

    let err = blocks.update(&ids[0], json!("nope")).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn duplicate_block_lands_after_original() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B", "C"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    let copy = blocks.duplicate_block(&ids[0]).await.unwrap();

    assert_eq!(copy.item["title"], "A (Copy)");
    assert_ne!(copy.item_id, blocks.block(&ids[0]).unwrap().item_id);
    assert_eq!(titles(&blocks, "main"), ["A", "A (Copy)", "B", "C"]);

    let created = harness.log.created(TEXT);
    assert_eq!(created, [json!({ "title": "A (Copy)", "body": "" })]);
}

#[tokio::test]
async fn duplicate_of_last_block_stays_last() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.duplicate_block(&ids[1]).await.unwrap();

    assert_eq!(titles(&blocks, "main"), ["A", "B", "B (Copy)"]);
    assert_eq!(harness.log.count_method(Method::Patch), 0);
}

#[tokio::test]
async fn placement_rules() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B"]);
    let harness = Harness::new(host);
    let options = Options::new()
        .areas([
            AreaConfig::new("main", "Main").max_items(2).default_area(),
            AreaConfig::new("hero", "Hero").allowed_types([HERO]),
        ])
        .allowed_collections([TEXT, HERO]);
    let mut blocks = harness.open(options).await;

    let full = blocks
        .create("main", TEXT, json!({ "title": "C" }))
        .await
        .unwrap_err();
    assert!(full.is_validation());

    let wrong_type = blocks
        .create("hero", TEXT, json!({ "title": "C" }))
        .await
        .unwrap_err();
    assert!(wrong_type.is_validation());

    let not_allowed = blocks.link("sidebar", "content_video", 1).await.unwrap_err();
    assert!(not_allowed.is_validation());

    let bad_area = blocks
        .create("side bar!", TEXT, json!({}))
        .await
        .unwrap_err();
    assert!(bad_area.is_validation());

    assert!(harness.log.is_empty());

    assert!(!blocks.can_move_to_area(&ids[0], "hero"));
    assert!(blocks.can_move_to_area(&ids[0], "sidebar"));
    assert!(blocks.can_move_to_area(&ids[0], "main"));
    assert!(!blocks.can_move_to_area(&ItemId::Int(99), "main"));
}

#[tokio::test]
async fn limits_across_areas() {
    let host = host();
    text_blocks(&host, "main", &["A", "B"]);
    let harness = Harness::new(host);
    let mut blocks = harness
        .open(Options::new().max_items_per_area(2).max_total_blocks(3))
        .await;

    let err = blocks
        .create("main", TEXT, json!({ "title": "C" }))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    blocks
        .create("sidebar", TEXT, json!({ "title": "C" }))
        .await
        .unwrap();

    let err = blocks
        .create("footer", TEXT, json!({ "title": "D" }))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn orphaned_item_is_reported() {
    let host = host();
    host.inject(
        Fault::status(403, "You don't have permission to access this.")
            .on(Method::Post)
            .path("/items/page_blocks"),
    );
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    let err = blocks
        .create("main", TEXT, json!({ "title": "Lost" }))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(blocks.blocks().is_empty());
    assert_eq!(harness.host.rows(TEXT).len(), 1);

    let warnings = blocks.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::OrphanedItem);
    assert_eq!(warnings[0].collection, TEXT);
    assert_eq!(warnings[0].id, Some(ItemId::Int(1)));
    assert!(blocks.warnings().is_empty());
}

#[tokio::test]
async fn unreadable_linked_item_gets_placeholder() {
    let host = host();
    host.insert(TEXT, json!({ "id": 7, "title": "Seven" })).unwrap();
    host.inject(
        Fault::status(403, "You don't have permission to access this.")
            .on(Method::Get)
            .path("/items/content_text"),
    );
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    let block = blocks.link("main", TEXT, 7).await.unwrap();

    assert_eq!(block.item, json!({ "id": 7 }));
    assert_eq!(block.title(), "Text #1");
    assert_eq!(blocks.warnings()[0].kind, WarningKind::ItemNotFetched);
}

#[tokio::test]
async fn default_item_data_from_fields() {
    let harness = Harness::new(host());
    let blocks = harness.open(Options::default()).await;

    let data = blocks.default_item_data(TEXT).await.unwrap();
    assert_eq!(data, json!({ "title": "", "body": "" }));
}
