use layout_blocks::{
    driver::operation::Method, Action, ItemId, Options, PermissionGate, Permissions,
    UserPermissions,
};
use layout_blocks_core::schema::{PermissionRecord, User, UserRole};
use layout_blocks_driver_memory::Fault;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{fixtures::*, Harness};

fn editor() -> User {
    User {
        id: Some("u1".to_string()),
        role: Some(UserRole {
            id: Some("editor".to_string()),
            admin_access: false,
        }),
    }
}

/// An editor who may manage page blocks and create text items only.
fn editor_records() -> Vec<PermissionRecord> {
    vec![
        PermissionRecord::new(JUNCTION, Action::Create).role("editor"),
        PermissionRecord::new(JUNCTION, Action::Update).role("editor"),
        PermissionRecord::new(JUNCTION, Action::Read).role("editor"),
        PermissionRecord::new(PARENT, Action::Update).role("editor"),
        PermissionRecord::new(TEXT, Action::Create).role("editor"),
        PermissionRecord::new(TEXT, Action::Read).role("editor"),
        PermissionRecord::new(TEXT, Action::Update)
            .role("editor")
            .fields(&["title"]),
        PermissionRecord::new(HERO, Action::Create).role("author"),
    ]
}

#[test]
fn no_records_grant_everything() {
    let permissions = Permissions::new(None, vec![]);
    assert_eq!(
        permissions.check_permissions(JUNCTION, PARENT),
        UserPermissions::all()
    );
}

#[tokio::test]
async fn failed_fetch_denies_writes() {
    let host = host();
    text_blocks(&host, "main", &["A"]);
    host.inject(Fault::status(500, "boom").path("/permissions"));
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    assert_eq!(blocks.blocks().len(), 1);
    assert!(!blocks.permissions().has_any(JUNCTION));

    let err = blocks
        .create("main", TEXT, json!({ "title": "B" }))
        .await
        .unwrap_err();
    assert!(err.is_permission());

    let id = blocks.blocks()[0].id.clone();
    assert!(blocks.unlink(&id).await.unwrap_err().is_permission());
    assert!(blocks.reorder("main", &[id]).await.unwrap_err().is_permission());

    assert_eq!(harness.log.writes(), 0);
}

#[tokio::test]
async fn records_scope_by_role() {
    let host = host();
    host.set_permissions(editor_records())
        .set_user(Some(editor()));
    let harness = Harness::new(host);

    let permissions = Permissions::fetch(&harness.client()).await;
    assert_eq!(
        harness.log.requests(),
        ["GET /permissions/me", "GET /users/me"]
    );
    assert_eq!(
        permissions.check_permissions(JUNCTION, PARENT),
        UserPermissions {
            create: true,
            update: true,
            delete: false,
            reorder: true,
            manage_areas: false,
        }
    );
    assert!(permissions.can_link(TEXT));
    assert!(permissions.can_duplicate(TEXT));
    assert!(!permissions.check(HERO, Action::Create));
    assert!(!permissions.has_any(HERO));
}

#[tokio::test]
async fn engine_honours_loaded_records() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A"]);
    host.set_permissions(editor_records())
        .set_user(Some(editor()));
    let harness = Harness::new(host);
    let mut blocks = harness.open(Options::default()).await;

    blocks
        .create("main", TEXT, json!({ "title": "B" }))
        .await
        .unwrap();

    let err = blocks
        .create("main", HERO, json!({ "headline": "Hi" }))
        .await
        .unwrap_err();
    assert!(err.is_permission());
    assert_eq!(err.collection(), Some(HERO));

    let err = blocks.unlink(&ids[0]).await.unwrap_err();
    assert!(err.is_permission());
    assert_eq!(blocks.blocks().len(), 2);
}

#[tokio::test]
async fn admins_bypass_records() {
    let host = host();
    let admin = User {
        id: Some("u0".to_string()),
        role: Some(UserRole {
            id: Some("admin".to_string()),
            admin_access: true,
        }),
    };
    host.set_permissions(editor_records()).set_user(Some(admin));
    let harness = Harness::new(host);

    let permissions = Permissions::fetch(&harness.client()).await;
    assert_eq!(
        permissions.check_permissions(JUNCTION, PARENT),
        UserPermissions::all()
    );
}

#[tokio::test]
async fn records_without_user_grant_nothing() {
    let host = host();
    host.set_permissions(editor_records()).set_user(None);
    let harness = Harness::new(host);

    let permissions = Permissions::fetch(&harness.client()).await;
    assert_eq!(
        permissions.check_permissions(JUNCTION, PARENT),
        UserPermissions::none()
    );
}

#[derive(Debug)]
struct ReadOnly;

impl PermissionGate for ReadOnly {
    fn check(&self, _collection: &str, action: Action) -> bool {
        action == Action::Read
    }
}

#[tokio::test]
async fn custom_gate_replaces_host_permissions() {
    let host = host();
    let ids = text_blocks(&host, "main", &["A", "B"]);
    let harness = Harness::new(host);

    let mut builder = harness.builder();
    builder.permissions(ReadOnly);
    let mut blocks = harness.try_open(&builder).await.unwrap();
    blocks.load(1).await.unwrap();

    assert!(!harness
        .log
        .requests()
        .iter()
        .any(|request| request.contains("/permissions")));
    harness.log.clear();

    assert!(blocks.link("main", TEXT, 1).await.unwrap_err().is_permission());
    assert!(blocks
        .update(&ids[0], json!({ "title": "X" }))
        .await
        .unwrap_err()
        .is_permission());
    assert!(blocks
        .reorder("main", &[ids[1].clone(), ids[0].clone()])
        .await
        .unwrap_err()
        .is_permission());
    assert!(blocks
        .move_block(&ids[1], "main", Some(0))
        .await
        .unwrap_err()
        .is_permission());
    assert!(blocks
        .duplicate_block(&ItemId::Int(1))
        .await
        .unwrap_err()
        .is_permission());

    assert_eq!(harness.log.count_method(Method::Get), 0);
    assert!(harness.log.is_empty());
}

#[test]
fn field_lists_limit_updates() {
    let permissions = Permissions::new(Some(editor()), editor_records());

    assert_eq!(
        permissions.check_fields(TEXT, &["title", "body"]),
        [("title", true), ("body", false)]
    );
    assert!(permissions.check_field(JUNCTION, Action::Update, "sort"));
    assert!(!permissions.check_field(HERO, Action::Update, "headline"));
}
