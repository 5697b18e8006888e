//! Moving entities within and between trees.

use chrono::Utc;
use tracing::info;

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::ItemId;
use foldershare_entity::grants::AccessGrants;
use foldershare_entity::item::{Item, ItemKind};
use foldershare_entity::usage::UsageDelta;

use crate::engine::TreeEngine;

impl TreeEngine {
    /// Move an entity under a destination folder.
    ///
    /// Rejects moves that would place an entity inside its own subtree.
    /// Locks the source, the destination, and every subfolder of the
    /// source for the duration. Ownership and usage counts are unchanged,
    /// except that a root folder moved under another folder stops counting
    /// as a root folder.
    pub async fn move_to_folder(
        &self,
        item_id: ItemId,
        dest_parent_id: ItemId,
        new_name: Option<&str>,
    ) -> AppResult<Item> {
        let item = self.require_item(item_id).await?;
        let dest = self.require_folder(dest_parent_id).await?;

        if dest.id == item.id {
            return Err(AppError::validation("Cannot move an entity into itself"));
        }
        let dest_ancestors = self.store.list_ancestors(dest.id).await?;
        if dest_ancestors.iter().any(|a| a.id == item.id) {
            return Err(AppError::validation(
                "Cannot move an entity into one of its own descendants",
            ));
        }

        let descendants = self.store.list_descendants(item.id).await?;
        let mut lock_ids: Vec<ItemId> = vec![item.id, dest.id];
        if let Some(parent_id) = item.parent_id {
            lock_ids.push(parent_id);
        }
        lock_ids.extend(descendants.iter().filter(|d| d.is_folder()).map(|d| d.id));
        let _locks = self.locks.try_lock_all(&lock_ids)?;

        let mut taken = self.child_names(dest.id).await?;
        if item.parent_id == Some(dest.id) {
            taken.remove(&item.name);
        }
        let name = self.resolve_name(new_name.unwrap_or(&item.name), &taken, false)?;

        let old_parent_id = item.parent_id;
        let was_root = item.is_root();

        let mut item = item;
        item.name = name;
        item.parent_id = Some(dest.id);
        item.root_id = dest.root_id;
        if was_root {
            // A root folder demoted under a parent loses its root kind and
            // its grant storage; access now resolves through the new root.
            item.kind = ItemKind::Folder;
            item.grants = None;
            self.store
                .apply_usage_delta(
                    item.owner_id,
                    &UsageDelta {
                        root_folders: -1,
                        ..UsageDelta::default()
                    },
                )
                .await?;
        }
        let item = self.save(item).await?;

        for mut descendant in descendants {
            descendant.root_id = dest.root_id;
            descendant.changed_at = Utc::now();
            self.store.update(&descendant).await?;
        }

        self.clear_sizes_upward(old_parent_id).await?;
        self.clear_sizes_upward(Some(dest.id)).await?;
        info!(item_id = %item.id, dest_parent_id = %dest.id, "Entity moved");
        Ok(item)
    }

    /// Promote a folder to a new root folder.
    ///
    /// Only folders can live at the top level. The folder gains fresh
    /// grants (owner only) and its whole subtree is re-rooted onto it.
    pub async fn move_to_root(&self, item_id: ItemId, new_name: Option<&str>) -> AppResult<Item> {
        let item = self.require_item(item_id).await?;
        if !item.is_folder() {
            return Err(AppError::validation(
                "Only folders can be moved to the top level",
            ));
        }
        if item.is_root() && new_name.is_none() {
            return Ok(item);
        }

        let descendants = self.store.list_descendants(item.id).await?;
        let mut lock_ids: Vec<ItemId> = vec![item.id];
        if let Some(parent_id) = item.parent_id {
            lock_ids.push(parent_id);
        }
        lock_ids.extend(descendants.iter().filter(|d| d.is_folder()).map(|d| d.id));
        let _locks = self.locks.try_lock_all(&lock_ids)?;

        let mut taken = self.root_names(item.owner_id).await?;
        if item.is_root() {
            taken.remove(&item.name);
        }
        let name = self.resolve_name(new_name.unwrap_or(&item.name), &taken, false)?;

        let old_parent_id = item.parent_id;
        let was_root = item.is_root();

        let mut item = item;
        item.name = name;
        item.parent_id = None;
        item.root_id = item.id;
        item.kind = ItemKind::RootFolder;
        if item.grants.is_none() {
            item.grants = Some(AccessGrants::new(item.owner_id));
        }
        if !was_root {
            self.store
                .apply_usage_delta(
                    item.owner_id,
                    &UsageDelta {
                        root_folders: 1,
                        ..UsageDelta::default()
                    },
                )
                .await?;
        }
        let item = self.save(item).await?;

        for mut descendant in descendants {
            descendant.root_id = item.id;
            descendant.changed_at = Utc::now();
            self.store.update(&descendant).await?;
        }

        self.clear_sizes_upward(old_parent_id).await?;
        info!(item_id = %item.id, "Folder promoted to root");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::testutil::engine;
    use foldershare_core::error::ErrorKind;
    use foldershare_core::types::UserId;

    const OWNER: UserId = UserId(1);

    #[tokio::test]
    async fn test_move_into_sibling() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let a = engine.create_folder(OWNER, root.id, "a", false).await.unwrap();
        let b = engine.create_folder(OWNER, root.id, "b", false).await.unwrap();

        let moved = engine.move_to_folder(a.id, b.id, None).await.unwrap();
        assert_eq!(moved.parent_id, Some(b.id));
        assert_eq!(moved.root_id, root.id);

        let children = engine.store().list_children(root.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "b");
    }

    #[tokio::test]
    async fn test_move_into_own_descendant_fails() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let a = engine.create_folder(OWNER, root.id, "a", false).await.unwrap();
        let b = engine.create_folder(OWNER, a.id, "b", false).await.unwrap();

        let err = engine.move_to_folder(a.id, b.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = engine.move_to_folder(a.id, a.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_move_root_under_folder_updates_subtree() {
        let (engine, _dir) = engine().await;
        let home = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let other = engine.create_root_folder(OWNER, "other", false).await.unwrap();
        let inner = engine
            .create_folder(OWNER, other.id, "inner", false)
            .await
            .unwrap();

        let moved = engine.move_to_folder(other.id, home.id, None).await.unwrap();
        assert!(!moved.is_root());
        assert!(moved.grants.is_none());
        assert_eq!(moved.root_id, home.id);

        let inner = engine.store().find_by_id(inner.id).await.unwrap().unwrap();
        assert_eq!(inner.root_id, home.id);

        let usage = engine.store().get_usage(OWNER).await.unwrap();
        assert_eq!(usage.n_root_folders, 1);
        assert_eq!(usage.n_folders, 3);
    }

    #[tokio::test]
    async fn test_move_to_root_promotes_folder() {
        let (engine, _dir) = engine().await;
        let home = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let docs = engine
            .create_folder(OWNER, home.id, "docs", false)
            .await
            .unwrap();
        let sub = engine.create_folder(OWNER, docs.id, "sub", false).await.unwrap();

        let promoted = engine.move_to_root(docs.id, None).await.unwrap();
        assert!(promoted.is_root());
        assert_eq!(promoted.root_id, promoted.id);
        assert!(promoted.grants.is_some());

        let sub = engine.store().find_by_id(sub.id).await.unwrap().unwrap();
        assert_eq!(sub.root_id, promoted.id);

        let usage = engine.store().get_usage(OWNER).await.unwrap();
        assert_eq!(usage.n_root_folders, 2);
    }

    #[tokio::test]
    async fn test_move_collision_fails() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let a = engine.create_folder(OWNER, root.id, "a", false).await.unwrap();
        let b = engine.create_folder(OWNER, a.id, "b", false).await.unwrap();
        engine.create_folder(OWNER, root.id, "b", false).await.unwrap();

        let err = engine.move_to_folder(b.id, root.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
