//! Deleting entities and their subtrees.

use tracing::{info, warn};

use foldershare_core::error::AppError;
use foldershare_core::events::{EventPhase, TreeEvent};
use foldershare_core::result::AppResult;
use foldershare_core::types::ItemId;
use foldershare_entity::item::Item;

use crate::engine::TreeEngine;
use crate::report::BulkReport;
use crate::usage::entity_delta;

impl TreeEngine {
    /// Delete an entity; with `recursive`, cascade over its subtree.
    ///
    /// Deleting a non-empty folder without `recursive` is a `Validation`
    /// error. Rows are removed leaf-first so the tree never dangles.
    /// Stored-file deletion failures are reported per item but do not stop
    /// the cascade; the metadata row is removed regardless.
    pub async fn delete(&self, item_id: ItemId, recursive: bool) -> AppResult<BulkReport<()>> {
        let item = self.require_item(item_id).await?;

        if item.is_folder() && !recursive {
            let children = self.store.count_children(item_id).await?;
            if children > 0 {
                return Err(AppError::validation(format!(
                    "Folder '{}' is not empty",
                    item.name
                )));
            }
        }

        let descendants = self.store.list_descendants(item.id).await?;
        let mut lock_ids: Vec<ItemId> = vec![item.id];
        if let Some(parent_id) = item.parent_id {
            lock_ids.push(parent_id);
        }
        lock_ids.extend(descendants.iter().filter(|d| d.is_folder()).map(|d| d.id));
        let _locks = self.locks.try_lock_all(&lock_ids)?;

        let parent_id = item.parent_id;
        let mut report = BulkReport::new(());

        // Leaf-first: reverse pre-order deletes children before parents.
        for descendant in descendants.iter().rev() {
            report.attempt();
            if let Err(err) = self.delete_one(descendant).await {
                report.fail(descendant.id, descendant.name.clone(), err);
            }
        }
        report.attempt();
        if let Err(err) = self.delete_one(&item).await {
            report.fail(item.id, item.name.clone(), err);
        }

        self.clear_sizes_upward(parent_id).await?;
        info!(
            item_id = %item.id,
            deleted = report.attempted - report.failures.len(),
            failures = report.failures.len(),
            "Entity deleted"
        );
        Ok(report)
    }

    /// Delete one entity row, its stored bytes, and its usage share.
    async fn delete_one(&self, item: &Item) -> AppResult<()> {
        self.notify(
            EventPhase::Before,
            TreeEvent::Deleted {
                item_id: item.id,
                owner_id: item.owner_id,
                name: item.name.clone(),
            },
        );

        if let Some(file_id) = item.file_id {
            let path = self.mapper.object_path(file_id)?;
            if let Err(err) = self.storage.delete(&path).await {
                // The row still goes away; the orphaned bytes are reported.
                warn!(item_id = %item.id, error = %err, "Stored file deletion failed");
                self.store.delete(item.id).await?;
                self.store
                    .apply_usage_delta(item.owner_id, &entity_delta(item).negated())
                    .await?;
                return Err(err);
            }
        }

        self.store.delete(item.id).await?;
        self.store
            .apply_usage_delta(item.owner_id, &entity_delta(item).negated())
            .await?;
        self.notify(
            EventPhase::After,
            TreeEvent::Deleted {
                item_id: item.id,
                owner_id: item.owner_id,
                name: item.name.clone(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::testutil::engine;
    use bytes::Bytes;
    use foldershare_core::error::ErrorKind;
    use foldershare_core::types::UserId;

    const OWNER: UserId = UserId(1);

    #[tokio::test]
    async fn test_delete_empty_folder() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let docs = engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();
        let report = engine.delete(docs.id, false).await.unwrap();
        assert!(report.is_complete());
        assert!(engine.store().find_by_id(docs.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_nonempty_without_recursive_fails() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();
        let err = engine.delete(root.id, false).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_recursive_delete_cascades_and_restores_usage() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let docs = engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();
        let file = engine
            .add_file(OWNER, docs.id, "a.txt", Bytes::from("abc"), false)
            .await
            .unwrap();

        let report = engine.delete(root.id, true).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.attempted, 3);

        assert!(engine.store().find_by_id(root.id).await.unwrap().is_none());
        assert!(engine.store().find_by_id(docs.id).await.unwrap().is_none());
        assert!(engine.store().find_by_id(file.id).await.unwrap().is_none());

        // Stored bytes are gone too.
        let path = engine.mapper().object_path(file.file_id.unwrap()).unwrap();
        assert!(!engine.storage().exists(&path).await.unwrap());

        let usage = engine.store().get_usage(OWNER).await.unwrap();
        assert!(usage.is_zero());
    }

    #[tokio::test]
    async fn test_delete_missing_entity_not_found() {
        let (engine, _dir) = engine().await;
        let err = engine
            .delete(foldershare_core::types::ItemId(999), false)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
