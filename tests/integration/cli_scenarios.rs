//! End-to-end engine scenarios mirroring a shell session: mkdir, ls,
//! rmdir, mv, cp, and sharing.

use bytes::Bytes;

use foldershare_access::{decide, AccessOp, Actor};
use foldershare_core::config::sharing::SharingConfig;
use foldershare_core::error::ErrorKind;
use foldershare_core::types::RolePermissions;
use foldershare_entity::grants::GrantLevel;
use foldershare_entity::store::EntityStore;

use crate::helpers::{engine, ALICE, BOB};

#[tokio::test]
async fn test_mkdir_then_ls() {
    let (engine, _dir) = engine().await;
    let root = engine.create_root_folder(ALICE, "home", false).await.unwrap();
    engine.create_folder(ALICE, root.id, "zoo", false).await.unwrap();
    engine.create_folder(ALICE, root.id, "docs", false).await.unwrap();
    engine
        .add_file(ALICE, root.id, "readme.txt", Bytes::from("hi"), false)
        .await
        .unwrap();

    // Listing is name-sorted regardless of creation order.
    let children = engine.store().list_children(root.id).await.unwrap();
    let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "readme.txt", "zoo"]);
}

#[tokio::test]
async fn test_rmdir_of_non_empty_folder_fails() {
    let (engine, _dir) = engine().await;
    let root = engine.create_root_folder(ALICE, "home", false).await.unwrap();
    let docs = engine.create_folder(ALICE, root.id, "docs", false).await.unwrap();
    engine
        .add_file(ALICE, docs.id, "a.txt", Bytes::from("a"), false)
        .await
        .unwrap();

    let err = engine.delete(docs.id, false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Recursive delete takes the subtree with it.
    let report = engine.delete(docs.id, true).await.unwrap();
    assert!(report.is_complete());
    assert!(engine.store().find_by_id(docs.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_mv_into_sibling_folder() {
    let (engine, _dir) = engine().await;
    let root = engine.create_root_folder(ALICE, "home", false).await.unwrap();
    let src = engine.create_folder(ALICE, root.id, "src", false).await.unwrap();
    let dest = engine.create_folder(ALICE, root.id, "dest", false).await.unwrap();
    let file = engine
        .add_file(ALICE, src.id, "notes.txt", Bytes::from("n"), false)
        .await
        .unwrap();

    let moved = engine.move_to_folder(file.id, dest.id, None).await.unwrap();
    assert_eq!(moved.parent_id, Some(dest.id));
    assert_eq!(moved.root_id, root.id);

    let src_children = engine.store().list_children(src.id).await.unwrap();
    assert!(src_children.is_empty());
}

#[tokio::test]
async fn test_cp_twice_needs_rename() {
    let (engine, _dir) = engine().await;
    let root = engine.create_root_folder(ALICE, "home", false).await.unwrap();
    let dest = engine.create_folder(ALICE, root.id, "backup", false).await.unwrap();
    let file = engine
        .add_file(ALICE, root.id, "report.txt", Bytes::from("r"), false)
        .await
        .unwrap();

    let first = engine
        .copy_to_folder(ALICE, file.id, dest.id, false, None)
        .await
        .unwrap();
    assert_eq!(first.value.name, "report.txt");

    // Same copy again without auto-rename collides.
    let err = engine
        .copy_to_folder(ALICE, file.id, dest.id, false, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // With auto-rename the counter goes before the extension.
    let second = engine
        .copy_to_folder(ALICE, file.id, dest.id, true, None)
        .await
        .unwrap();
    assert_eq!(second.value.name, "report (1).txt");
}

#[tokio::test]
async fn test_view_grant_does_not_confer_author() {
    let (engine, _dir) = engine().await;
    let root = engine.create_root_folder(ALICE, "shared", false).await.unwrap();
    let root = engine.add_grant(root.id, BOB, GrantLevel::View).await.unwrap();

    let bob = Actor::new(BOB, RolePermissions::member());
    let policy = SharingConfig::default();

    let view = decide(&bob, AccessOp::View, Some(&root), None, &policy);
    assert!(view.is_allowed());

    let update = decide(&bob, AccessOp::Update, Some(&root), None, &policy);
    assert!(!update.is_allowed());
}
