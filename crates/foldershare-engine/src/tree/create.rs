//! Folder and file creation.

use bytes::Bytes;
use tracing::info;

use foldershare_core::error::AppError;
use foldershare_core::events::{EventPhase, TreeEvent};
use foldershare_core::result::AppResult;
use foldershare_core::types::{FileId, ItemId, UserId};
use foldershare_entity::grants::AccessGrants;
use foldershare_entity::item::{CreateItem, Item, ItemKind};
use foldershare_entity::usage::UsageDelta;
use foldershare_storage::local::mime_from_name;

use crate::engine::TreeEngine;
use crate::report::BulkReport;

/// Choose the file kind for a name from its MIME type.
pub fn kind_for_name(name: &str) -> ItemKind {
    match mime_from_name(name) {
        Some(mime) if mime.starts_with("image/") => ItemKind::Image,
        Some(mime) if mime.starts_with("video/") || mime.starts_with("audio/") => ItemKind::Media,
        _ => ItemKind::File,
    }
}

impl TreeEngine {
    /// Create a new root folder owned by `owner_id`.
    ///
    /// Root-folder names are unique per owner. With `allow_rename`, a
    /// collision gets a numeric disambiguator; otherwise it fails.
    pub async fn create_root_folder(
        &self,
        owner_id: UserId,
        name: &str,
        allow_rename: bool,
    ) -> AppResult<Item> {
        let taken = self.root_names(owner_id).await?;
        let name = self.resolve_name(name, &taken, allow_rename)?;

        let item = self
            .store
            .create(&CreateItem {
                kind: ItemKind::RootFolder,
                name,
                parent_id: None,
                root_id: None,
                owner_id,
                size: None,
                description: String::new(),
                file_id: None,
                grants: Some(AccessGrants::new(owner_id)),
            })
            .await?;

        self.store
            .apply_usage_delta(owner_id, &UsageDelta::folder_created(true))
            .await?;
        self.notify(
            EventPhase::After,
            TreeEvent::Created {
                item_id: item.id,
                parent_id: None,
                owner_id,
                name: item.name.clone(),
            },
        );
        info!(item_id = %item.id, owner_id = %owner_id, name = %item.name, "Root folder created");
        Ok(item)
    }

    /// Create a folder under an existing folder.
    pub async fn create_folder(
        &self,
        owner_id: UserId,
        parent_id: ItemId,
        name: &str,
        allow_rename: bool,
    ) -> AppResult<Item> {
        let parent = self.require_folder(parent_id).await?;
        let _lock = self.locks.try_lock(parent_id)?;
        self.create_folder_locked(owner_id, &parent, name, allow_rename)
            .await
    }

    /// Folder creation body; the parent's lock must already be held.
    pub(crate) async fn create_folder_locked(
        &self,
        owner_id: UserId,
        parent: &Item,
        name: &str,
        allow_rename: bool,
    ) -> AppResult<Item> {
        let taken = self.child_names(parent.id).await?;
        let name = self.resolve_name(name, &taken, allow_rename)?;

        let item = self
            .store
            .create(&CreateItem {
                kind: ItemKind::Folder,
                name,
                parent_id: Some(parent.id),
                root_id: Some(parent.root_id),
                owner_id,
                size: None,
                description: String::new(),
                file_id: None,
                grants: None,
            })
            .await?;

        self.store
            .apply_usage_delta(owner_id, &UsageDelta::folder_created(false))
            .await?;
        self.notify(
            EventPhase::After,
            TreeEvent::Created {
                item_id: item.id,
                parent_id: Some(parent.id),
                owner_id,
                name: item.name.clone(),
            },
        );
        info!(item_id = %item.id, parent_id = %parent.id, name = %item.name, "Folder created");
        Ok(item)
    }

    /// Wrap uploaded bytes as a new file entity under a folder.
    pub async fn add_file(
        &self,
        owner_id: UserId,
        parent_id: ItemId,
        name: &str,
        data: Bytes,
        allow_rename: bool,
    ) -> AppResult<Item> {
        let parent = self.require_folder(parent_id).await?;
        let _lock = self.locks.try_lock(parent_id)?;
        self.add_file_locked(owner_id, &parent, name, data, allow_rename)
            .await
    }

    /// Add several files under one folder, finishing as many as possible.
    ///
    /// Failed entries are reported against the containing folder, keyed by
    /// the file name that could not be added.
    pub async fn add_files(
        &self,
        owner_id: UserId,
        parent_id: ItemId,
        files: Vec<(String, Bytes)>,
        allow_rename: bool,
    ) -> AppResult<BulkReport<Vec<Item>>> {
        let parent = self.require_folder(parent_id).await?;
        let _lock = self.locks.try_lock(parent_id)?;

        let mut report = BulkReport::new(Vec::with_capacity(files.len()));
        for (name, data) in files {
            report.attempt();
            match self
                .add_file_locked(owner_id, &parent, &name, data, allow_rename)
                .await
            {
                Ok(item) => report.value.push(item),
                Err(err) => report.fail(parent_id, name, err),
            }
        }
        Ok(report)
    }

    /// File creation body; the parent's lock must already be held.
    pub(crate) async fn add_file_locked(
        &self,
        owner_id: UserId,
        parent: &Item,
        name: &str,
        data: Bytes,
        allow_rename: bool,
    ) -> AppResult<Item> {
        if data.len() as u64 > self.storage_config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.storage_config.max_upload_size_bytes
            )));
        }

        let taken = self.child_names(parent.id).await?;
        let name = self.resolve_name(name, &taken, allow_rename)?;
        let size = data.len() as i64;

        let mut item = self
            .store
            .create(&CreateItem {
                kind: kind_for_name(&name),
                name,
                parent_id: Some(parent.id),
                root_id: Some(parent.root_id),
                owner_id,
                size: Some(size),
                description: String::new(),
                file_id: None,
                grants: None,
            })
            .await?;

        // The stored file reuses the entity's id as its stable identity.
        let file_id = FileId(item.id.0);
        let object_path = self.mapper.object_path(file_id)?;
        if let Err(err) = self.storage.write(&object_path, data).await {
            // Don't leave a row pointing at bytes that were never written.
            let _ = self.store.delete(item.id).await;
            return Err(err);
        }

        item.file_id = Some(file_id);
        let item = self.store.update(&item).await?;

        self.store
            .apply_usage_delta(owner_id, &UsageDelta::file_created(size))
            .await?;
        self.clear_sizes_upward(Some(parent.id)).await?;
        self.notify(
            EventPhase::After,
            TreeEvent::Created {
                item_id: item.id,
                parent_id: Some(parent.id),
                owner_id,
                name: item.name.clone(),
            },
        );
        info!(item_id = %item.id, parent_id = %parent.id, size, "File added");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::testutil::engine;
    use foldershare_core::error::ErrorKind;

    const OWNER: UserId = UserId(1);

    #[test]
    fn test_kind_for_name() {
        assert_eq!(kind_for_name("photo.png"), ItemKind::Image);
        assert_eq!(kind_for_name("song.mp3"), ItemKind::Media);
        assert_eq!(kind_for_name("notes.txt"), ItemKind::File);
        assert_eq!(kind_for_name("no_extension"), ItemKind::File);
    }

    #[tokio::test]
    async fn test_create_root_and_subfolders() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        assert!(root.is_root());
        assert_eq!(root.root_id, root.id);
        assert!(root.grants.is_some());

        let sub = engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();
        assert_eq!(sub.parent_id, Some(root.id));
        assert_eq!(sub.root_id, root.id);
        assert!(sub.grants.is_none());
    }

    #[tokio::test]
    async fn test_sibling_collision_without_rename_fails() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();
        let err = engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_collision_with_rename_disambiguates() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();
        let second = engine
            .create_folder(OWNER, root.id, "docs", true)
            .await
            .unwrap();
        assert_eq!(second.name, "docs (1)");
    }

    #[tokio::test]
    async fn test_add_file_stores_bytes_and_usage() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let file = engine
            .add_file(OWNER, root.id, "notes.txt", Bytes::from("hello"), false)
            .await
            .unwrap();
        assert_eq!(file.size, Some(5));
        let file_id = file.file_id.unwrap();

        let path = engine.mapper().object_path(file_id).unwrap();
        let stored = engine.storage().read_bytes(&path).await.unwrap();
        assert_eq!(stored, Bytes::from("hello"));

        let usage = engine.store().get_usage(OWNER).await.unwrap();
        assert_eq!(usage.n_files, 1);
        assert_eq!(usage.n_bytes, 5);
        assert_eq!(usage.n_root_folders, 1);
    }

    #[tokio::test]
    async fn test_add_files_reports_per_file_failures() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let report = engine
            .add_files(
                OWNER,
                root.id,
                vec![
                    ("a.txt".to_string(), Bytes::from("a")),
                    ("bad/name".to_string(), Bytes::from("b")),
                    ("c.txt".to_string(), Bytes::from("c")),
                ],
                false,
            )
            .await
            .unwrap();
        assert_eq!(report.value.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "bad/name");
    }

    #[tokio::test]
    async fn test_locked_parent_rejects_create() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let _guard = engine.locks().try_lock(root.id).unwrap();
        let err = engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lock);
    }
}
