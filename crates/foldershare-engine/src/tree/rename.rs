//! Renaming entities.

use tracing::info;

use foldershare_core::result::AppResult;
use foldershare_core::types::ItemId;
use foldershare_entity::item::Item;

use crate::engine::TreeEngine;

impl TreeEngine {
    /// Rename an entity, keeping it under its current parent.
    ///
    /// Locks the entity and its parent's namespace for the duration. The
    /// stored file is untouched: on-disk placement derives from the stable
    /// file id, never from the name.
    pub async fn rename(&self, item_id: ItemId, new_name: &str) -> AppResult<Item> {
        let item = self.require_item(item_id).await?;

        let mut lock_ids = vec![item_id];
        if let Some(parent_id) = item.parent_id {
            lock_ids.push(parent_id);
        }
        let _locks = self.locks.try_lock_all(&lock_ids)?;

        let mut taken = match item.parent_id {
            Some(parent_id) => self.child_names(parent_id).await?,
            None => self.root_names(item.owner_id).await?,
        };
        taken.remove(&item.name);
        let name = self.resolve_name(new_name, &taken, false)?;

        if name == item.name {
            return Ok(item);
        }

        let mut item = item;
        item.name = name;
        let item = self.save(item).await?;
        info!(item_id = %item.id, name = %item.name, "Entity renamed");
        Ok(item)
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
    async fn test_rename_folder() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let docs = engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();
        let renamed = engine.rename(docs.id, "papers").await.unwrap();
        assert_eq!(renamed.name, "papers");
    }

    #[tokio::test]
    async fn test_rename_collision_fails() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();
        let other = engine
            .create_folder(OWNER, root.id, "music", false)
            .await
            .unwrap();
        let err = engine.rename(other.id, "docs").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_rename_to_same_name_is_noop() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let renamed = engine.rename(root.id, "home").await.unwrap();
        assert_eq!(renamed.name, "home");
    }

    #[tokio::test]
    async fn test_rename_file_keeps_stored_bytes() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let file = engine
            .add_file(OWNER, root.id, "a.txt", Bytes::from("content"), false)
            .await
            .unwrap();
        let renamed = engine.rename(file.id, "b.txt").await.unwrap();
        assert_eq!(renamed.file_id, file.file_id);

        let path = engine
            .mapper()
            .object_path(renamed.file_id.unwrap())
            .unwrap();
        let stored = engine.storage().read_bytes(&path).await.unwrap();
        assert_eq!(stored, Bytes::from("content"));
    }

    #[tokio::test]
    async fn test_rename_root_folder_unique_per_owner() {
        let (engine, _dir) = engine().await;
        engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let other = engine.create_root_folder(OWNER, "work", false).await.unwrap();
        let err = engine.rename(other.id, "home").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
