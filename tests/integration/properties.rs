//! Structural properties held across mixed workloads.

use std::collections::HashSet;

use bytes::Bytes;

use foldershare_core::types::FileId;
use foldershare_entity::store::EntityStore;
use foldershare_storage::StoragePathMapper;

use crate::helpers::{engine, test_config, ALICE, BOB};

#[tokio::test]
async fn test_usage_recompute_matches_incremental_counters() {
    let (engine, _dir) = engine().await;

    // A mixed workload: creates, a copy, a move, a delete, a chown.
    let home = engine.create_root_folder(ALICE, "home", false).await.unwrap();
    let docs = engine.create_folder(ALICE, home.id, "docs", false).await.unwrap();
    engine
        .add_file(ALICE, docs.id, "a.txt", Bytes::from("aaaa"), false)
        .await
        .unwrap();
    let b = engine
        .add_file(ALICE, home.id, "b.txt", Bytes::from("bb"), false)
        .await
        .unwrap();
    engine.duplicate(ALICE, docs.id).await.unwrap();
    engine.move_to_root(docs.id, None).await.unwrap();
    engine.delete(b.id, false).await.unwrap();
    engine.change_owner(home.id, BOB).await.unwrap();

    let before_alice = engine.usage_for(ALICE).await.unwrap();
    let before_bob = engine.usage_for(BOB).await.unwrap();

    let recomputed = engine.update_usage_all_users().await.unwrap();
    for usage in recomputed {
        if usage.user_id == ALICE {
            assert_eq!(usage, before_alice);
        } else if usage.user_id == BOB {
            assert_eq!(usage, before_bob);
        }
    }
}

#[tokio::test]
async fn test_every_descendant_shares_the_root() {
    let (engine, _dir) = engine().await;
    let root = engine.create_root_folder(ALICE, "home", false).await.unwrap();
    let a = engine.create_folder(ALICE, root.id, "a", false).await.unwrap();
    let b = engine.create_folder(ALICE, a.id, "b", false).await.unwrap();
    engine
        .add_file(ALICE, b.id, "deep.txt", Bytes::from("d"), false)
        .await
        .unwrap();

    for item in engine.store().list_descendants(root.id).await.unwrap() {
        assert_eq!(item.root_id, root.id);
        let ancestors = engine.store().list_ancestors(item.id).await.unwrap();
        assert_eq!(ancestors.first().map(|r| r.id), Some(root.id));
        assert_eq!(ancestors.last().map(|l| l.id), Some(item.id));

        // The chain never repeats an entity.
        let ids: HashSet<_> = ancestors.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), ancestors.len());
    }
}

#[tokio::test]
async fn test_moves_cannot_create_cycles() {
    let (engine, _dir) = engine().await;
    let root = engine.create_root_folder(ALICE, "home", false).await.unwrap();
    let a = engine.create_folder(ALICE, root.id, "a", false).await.unwrap();
    let b = engine.create_folder(ALICE, a.id, "b", false).await.unwrap();

    assert!(engine.move_to_folder(a.id, b.id, None).await.is_err());
    assert!(engine.move_to_folder(a.id, a.id, None).await.is_err());
    assert!(engine.copy_to_folder(ALICE, a.id, b.id, true, None).await.is_err());
}

#[tokio::test]
async fn test_grant_invariants_after_every_mutation() {
    let (engine, _dir) = engine().await;
    let root = engine.create_root_folder(ALICE, "shared", false).await.unwrap();

    use foldershare_entity::grants::GrantLevel;
    let steps: Vec<foldershare_entity::item::Item> = vec![
        engine.add_grant(root.id, BOB, GrantLevel::View).await.unwrap(),
        engine.add_grant(root.id, BOB, GrantLevel::Author).await.unwrap(),
        engine.add_grant(root.id, BOB, GrantLevel::Disabled).await.unwrap(),
        engine.delete_grant(root.id, BOB, GrantLevel::Disabled).await.unwrap(),
        engine.clear_grants(root.id).await.unwrap(),
    ];
    for item in steps {
        let grants = item.grants.expect("root keeps grants");
        assert!(grants.invariants_hold(ALICE));
    }
}

#[tokio::test]
async fn test_storage_paths_are_deterministic_and_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mapper = StoragePathMapper::new(&config.storage).unwrap();

    let mut seen = HashSet::new();
    for id in [0, 1, 2, 9_999, 10_000, 123_456_789, i64::MAX] {
        let path = mapper.object_path(FileId(id)).unwrap();
        assert_eq!(path, mapper.object_path(FileId(id)).unwrap());
        assert!(seen.insert(path), "collision for id {id}");
    }
}
