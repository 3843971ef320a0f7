use layout_blocks::{
    driver::operation::Method, engine::WarningKind, AreaConfig, Blocks, ItemId, Options,
};
use layout_blocks_driver_memory::{Fault, Memory};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tests::{fixtures::*, ExecLog, Harness};

fn titles(blocks: &Blocks, area: &str) -> Vec<String> {
    blocks
        .get_blocks_for_area(area)
        .into_iter()
        .map(|b| b.title())
        .collect()
}

/// `(row id, patch)` of every junction update, in order.
fn patches(log: &ExecLog) -> Vec<(ItemId, Value)> {
    log.updates(JUNCTION)
        .into_iter()
        .map(|update| (update.id, update.data))
        .collect()
}

fn fractional_host() -> Memory {
    let host = bare_host();
    host.add_field(column(JUNCTION, "area", "string"))
        .add_field(column(JUNCTION, "sort", "float"));
    host
}

#[tokio::test]
async fn unlink_compacts_remaining_blocks() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B", "C"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.unlink(&ids[1]).await.unwrap();

    assert_eq!(
        harness.log.requests(),
        ["DELETE /items/page_blocks/2", "PATCH /items/page_blocks/3"]
    );
    assert_eq!(patches(&harness.log), [(ItemId::Int(3), json!({ "sort": 1 }))]);
    assert_eq!(
        junction_rows(&harness.host),
        [
            (json!(1), json!("main"), json!(0)),
            (json!(3), json!("main"), json!(1)),
        ]
    );
    assert_eq!(titles(&blocks, "main"), ["A", "C"]);
    assert_eq!(harness.host.rows(TEXT).len(), 3);
    assert!(blocks.warnings().is_empty());
}

#[tokio::test]
async fn move_to_front_writes_one_rank() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B", "C"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.move_block(&ids[2], "main", Some(0)).await.unwrap();

    assert_eq!(patches(&harness.log), [(ids[2].clone(), json!({ "sort": -1 }))]);
    assert_eq!(blocks.block(&ids[2]).unwrap().sort, -1.0);
    assert_eq!(titles(&blocks, "main"), ["C", "A", "B"]);
}

#[tokio::test]
async fn move_without_room_renumbers_area() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B", "C"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.move_block(&ids[0], "main", Some(1)).await.unwrap();

    assert_eq!(
        patches(&harness.log),
        [
            (ids[1].clone(), json!({ "sort": 0 })),
            (ids[0].clone(), json!({ "sort": 1 })),
        ]
    );
    assert_eq!(titles(&blocks, "main"), ["B", "A", "C"]);
    assert_eq!(
        junction_rows(&harness.host),
        [
            (json!(1), json!("main"), json!(1)),
            (json!(2), json!("main"), json!(0)),
            (json!(3), json!("main"), json!(2)),
        ]
    );
}

#[tokio::test]
async fn fractional_ranks_use_midpoint() {
    let host = fractional_host();
    let ids = text_blocks(&host, "main", &["A", "B", "C"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.move_block(&ids[0], "main", Some(1)).await.unwrap();

    assert_eq!(patches(&harness.log), [(ids[0].clone(), json!({ "sort": 1.5 }))]);
    assert_eq!(titles(&blocks, "main"), ["B", "A", "C"]);
}

#[tokio::test]
async fn move_to_other_area_appends() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B"]);
    text_blocks(&host, "sidebar", &["Aside"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.move_block(&ids[0], "sidebar", None).await.unwrap();

    assert_eq!(
        patches(&harness.log),
        [(ids[0].clone(), json!({ "area": "sidebar", "sort": 1 }))]
    );
    assert_eq!(titles(&blocks, "main"), ["B"]);
    assert_eq!(titles(&blocks, "sidebar"), ["Aside", "A"]);
}

#[tokio::test]
async fn move_within_area_without_index_appends() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B", "C"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.move_block(&ids[0], "main", None).await.unwrap();

    assert_eq!(patches(&harness.log), [(ids[0].clone(), json!({ "sort": 3 }))]);
    assert_eq!(titles(&blocks, "main"), ["B", "C", "A"]);

    harness.log.clear();
    blocks.move_block(&ids[0], "main", None).await.unwrap();

    assert!(harness.log.is_empty());
    assert_eq!(titles(&blocks, "main"), ["B", "C", "A"]);
}

#[tokio::test]
async fn edits_survive_reload() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B", "C", "D"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.move_block(&ids[3], "main", Some(1)).await.unwrap();
    blocks.unlink(&ids[1]).await.unwrap();
    let created = blocks
        .create("main", TEXT, json!({ "title": "E" }))
        .await
        .unwrap();
    blocks.delete(&created.id, true).await.unwrap();

    let order = [ids[2].clone(), ids[0].clone(), ids[3].clone()];
    blocks.reorder("main", &order).await.unwrap();

    blocks.reload().await.unwrap();

    let ranks: Vec<(ItemId, f64)> = blocks
        .get_blocks_for_area("main")
        .into_iter()
        .map(|b| (b.id.clone(), b.sort))
        .collect();
    assert_eq!(
        ranks,
        [
            (ids[2].clone(), 0.0),
            (ids[0].clone(), 1.0),
            (ids[3].clone(), 2.0),
        ]
    );
    assert_eq!(titles(&blocks, "main"), ["C", "A", "D"]);
    assert_eq!(blocks.blocks().len(), 3);
    assert!(harness.host.item(JUNCTION, created.id.clone()).is_none());
    assert!(harness
        .host
        .item(TEXT, created.item_id.clone().unwrap())
        .is_none());
    assert!(blocks.warnings().is_empty());
}

#[tokio::test]
async fn reorder_writes_changed_ranks_only() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B", "C"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    let order = [ids[2].clone(), ids[1].clone(), ids[0].clone()];
    blocks.reorder("main", &order).await.unwrap();

    assert_eq!(
        patches(&harness.log),
        [
            (ids[2].clone(), json!({ "sort": 0 })),
            (ids[0].clone(), json!({ "sort": 2 })),
        ]
    );
    assert_eq!(titles(&blocks, "main"), ["C", "B", "A"]);

    harness.log.clear();
    blocks.reorder("main", &order).await.unwrap();
    assert!(harness.log.is_empty());
}

#[tokio::test]
async fn reorder_rejects_blocks_of_other_areas() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B"]);
    let aside = text_blocks(&host, "sidebar", &["Aside"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    let err = blocks
        .reorder("main", &[aside[0].clone(), ids[0].clone()])
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = blocks
        .reorder("main", &[ids[1].clone(), ItemId::Int(42)])
        .await
        .unwrap_err();
    assert!(err.is_block_not_found());

    assert!(harness.log.is_empty());
}

#[tokio::test]
async fn locked_area_keeps_its_blocks() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B"]);
    let harness = Harness::new(host);
    let options =
        Options::new().areas([AreaConfig::new("main", "Main").locked().default_area()]);
    let mut blocks = harness.open(options).await;

    let err = blocks
        .reorder("main", &[ids[1].clone(), ids[0].clone()])
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = blocks
        .move_block(&ids[0], "sidebar", None)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = blocks
        .move_block(&ids[1], "main", Some(0))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert!(!blocks.can_move_to_area(&ids[0], "sidebar"));
    assert!(harness.log.is_empty());

    blocks.unlink(&ids[0]).await.unwrap();
    assert_eq!(titles(&blocks, "main"), ["B"]);
}

#[tokio::test]
async fn partial_renumber_applies_successful_writes() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B", "C"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    harness.host.inject(
        Fault::status(500, "boom")
            .on(Method::Patch)
            .path("/items/page_blocks/1")
            .times(1),
    );

    let err = blocks
        .reorder("main", &[ids[2].clone(), ids[1].clone(), ids[0].clone()])
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(harness.log.count_method(Method::Patch), 2);
    assert_eq!(blocks.block(&ids[2]).unwrap().sort, 0.0);
    assert_eq!(blocks.block(&ids[0]).unwrap().sort, 0.0);
    assert_eq!(
        junction_rows(&harness.host),
        [
            (json!(1), json!("main"), json!(0)),
            (json!(2), json!("main"), json!(1)),
            (json!(3), json!("main"), json!(0)),
        ]
    );
}

#[tokio::test]
async fn delete_removes_item_too() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks.delete(&ids[0], true).await.unwrap();

    assert_eq!(
        harness.log.requests(),
        [
            "DELETE /items/page_blocks/1",
            "DELETE /items/content_text/1",
            "PATCH /items/page_blocks/2",
        ]
    );
    assert!(harness.host.item(TEXT, 1).is_none());
    assert!(harness.host.item(JUNCTION, 1).is_none());
    assert_eq!(titles(&blocks, "main"), ["B"]);
}

#[tokio::test]
async fn remove_follows_delete_items_option() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B"]);
    let harness = Harness::new(host);

    let mut keeping = harness.open(Options::default()).await;
    keeping.remove(&ids[1]).await.unwrap();
    assert!(harness.host.item(TEXT, 2).is_some());

    let mut deleting = harness.open(Options::new().delete_items(true)).await;
    deleting.remove(&ids[0]).await.unwrap();
    assert!(harness.host.item(TEXT, 1).is_none());
    assert!(deleting.blocks().is_empty());
}

#[tokio::test]
async fn failed_item_delete_is_a_warning() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    harness.host.inject(
        Fault::status(403, "You don't have permission to access this.")
            .on(Method::Delete)
            .path("/items/content_text"),
    );

    blocks.delete(&ids[0], true).await.unwrap();

    assert!(blocks.blocks().is_empty());
    assert!(harness.host.item(TEXT, 1).is_some());

    let warnings = blocks.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::ItemNotDeleted);
    assert_eq!(warnings[0].id, Some(ItemId::Int(1)));
    assert_eq!(warnings[0].cause.status(), Some(403));
}

#[tokio::test]
async fn failed_compaction_is_a_warning() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B", "C"]);
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    harness
        .host
        .inject(Fault::status(503, "busy").on(Method::Patch));

    blocks.unlink(&ids[0]).await.unwrap();

    assert_eq!(titles(&blocks, "main"), ["B", "C"]);
    let warnings = blocks.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::SortNotCompacted);
    assert_eq!(warnings[0].collection, JUNCTION);
    assert_eq!(warnings[0].id, None);
}
