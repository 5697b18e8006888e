//! Packing subtrees into zip archives and extracting them back.
//!
//! Archives are built and read in memory; member caps and the extracted-
//! size cap come from storage configuration and guard against zip bombs.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};

use bytes::Bytes;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use foldershare_core::error::{AppError, ErrorKind};
use foldershare_core::result::AppResult;
use foldershare_core::types::{ItemId, UserId};
use foldershare_entity::item::Item;

use crate::engine::TreeEngine;
use crate::report::BulkReport;

impl TreeEngine {
    /// Pack child entities of a folder into a new zip file entity.
    ///
    /// Locks the containing folder and every item being archived. Members
    /// that cannot be read are skipped and reported; the archive is still
    /// produced with everything that could be packed. The new file is
    /// owned by the acting user and auto-renamed on collision.
    pub async fn archive_to_zip(
        &self,
        acting_user: UserId,
        parent_id: ItemId,
        child_ids: &[ItemId],
    ) -> AppResult<BulkReport<Item>> {
        if child_ids.is_empty() {
            return Err(AppError::validation("Nothing to archive"));
        }
        let parent = self.require_folder(parent_id).await?;

        let mut children = Vec::with_capacity(child_ids.len());
        let mut lock_ids: Vec<ItemId> = vec![parent_id];
        for &child_id in child_ids {
            let child = self.require_item(child_id).await?;
            if child.parent_id != Some(parent_id) {
                return Err(AppError::validation(format!(
                    "Entity '{}' is not a child of the archive folder",
                    child.name
                )));
            }
            lock_ids.push(child.id);
            let descendants = self.store.list_descendants(child.id).await?;
            lock_ids.extend(descendants.iter().map(|d| d.id));
            children.push(child);
        }
        let _locks = self.locks.try_lock_all(&lock_ids)?;

        let mut report = BulkReport::new(());
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut members = 0usize;

        // Depth-first over each selected child, names relative to the
        // containing folder.
        let mut stack: Vec<(Item, String)> = Vec::new();
        for child in children.iter().rev() {
            stack.push((child.clone(), child.name.clone()));
        }
        while let Some((item, member_path)) = stack.pop() {
            members += 1;
            if members > self.storage_config.max_zip_members {
                return Err(AppError::validation(format!(
                    "Archive would exceed the member limit of {}",
                    self.storage_config.max_zip_members
                )));
            }
            report.attempt();
            if item.is_folder() {
                writer
                    .add_directory(format!("{member_path}/"), options)
                    .map_err(zip_error)?;
                let grandchildren = self.store.list_children(item.id).await?;
                for grandchild in grandchildren.into_iter().rev() {
                    let path = format!("{member_path}/{}", grandchild.name);
                    stack.push((grandchild, path));
                }
            } else {
                match self.pack_file(&item).await {
                    Ok(data) => {
                        writer.start_file(&member_path, options).map_err(zip_error)?;
                        writer.write_all(&data).map_err(AppError::from)?;
                    }
                    Err(err) => report.fail(item.id, item.name.clone(), err),
                }
            }
        }

        let cursor = writer.finish().map_err(zip_error)?;
        let data = Bytes::from(cursor.into_inner());

        let archive_name = if children.len() == 1 {
            format!("{}.zip", children[0].name)
        } else {
            "archive.zip".to_string()
        };
        let item = self
            .add_file_locked(acting_user, &parent, &archive_name, data, true)
            .await?;

        info!(
            item_id = %item.id,
            members,
            failures = report.failures.len(),
            "Archive created"
        );
        Ok(report.map(|()| item))
    }

    /// Extract a zip file entity next to itself.
    ///
    /// Member paths become new folder and file entities owned by the
    /// acting user, preserving the archive's nested structure. Unsafe
    /// member names and unreadable members are reported and skipped.
    /// Returns the entities created at the top level of the extraction.
    pub async fn unarchive_from_zip(
        &self,
        acting_user: UserId,
        item_id: ItemId,
    ) -> AppResult<BulkReport<Vec<Item>>> {
        let item = self.require_item(item_id).await?;
        if !item.is_file() {
            return Err(AppError::validation("Only file entities can be extracted"));
        }
        let Some(file_id) = item.file_id else {
            return Err(AppError::validation("The entity has no stored content"));
        };
        let Some(parent_id) = item.parent_id else {
            return Err(AppError::validation(
                "The archive has no containing folder to extract into",
            ));
        };
        let parent = self.require_folder(parent_id).await?;
        let _lock = self.locks.try_lock(parent_id)?;

        let object_path = self.mapper.object_path(file_id)?;
        let data = self.storage.read_bytes(&object_path).await?;
        let mut archive = ZipArchive::new(Cursor::new(data.to_vec())).map_err(|e| {
            AppError::with_source(
                ErrorKind::Validation,
                format!("'{}' is not a valid zip archive", item.name),
                e,
            )
        })?;

        if archive.len() > self.storage_config.max_zip_members {
            return Err(AppError::validation(format!(
                "Archive exceeds the member limit of {}",
                self.storage_config.max_zip_members
            )));
        }
        let mut total: u64 = 0;
        for i in 0..archive.len() {
            total = total.saturating_add(archive.by_index(i).map_err(zip_error)?.size());
        }
        if total > self.storage_config.max_zip_extracted_bytes {
            return Err(AppError::validation(format!(
                "Archive would extract more than {} bytes",
                self.storage_config.max_zip_extracted_bytes
            )));
        }

        let mut report = BulkReport::new(Vec::new());
        // Folders created so far, keyed by their archive-relative path.
        let mut folders: HashMap<String, Item> = HashMap::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(zip_error)?;
            report.attempt();

            let raw_name = entry.name().to_string();
            let Some(member_path) = entry.enclosed_name() else {
                report.fail(
                    item.id,
                    raw_name,
                    AppError::validation("Unsafe member path in archive"),
                );
                continue;
            };
            let segments: Vec<String> = member_path
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            if segments.is_empty() {
                continue;
            }

            let outcome = if entry.is_dir() {
                self.ensure_extract_folder(acting_user, &parent, &mut folders, &segments)
                    .await
                    .map(|_| None)
            } else {
                let mut contents = Vec::with_capacity(entry.size() as usize);
                match entry.read_to_end(&mut contents) {
                    Ok(_) => {
                        self.extract_file(
                            acting_user,
                            &parent,
                            &mut folders,
                            &segments,
                            Bytes::from(contents),
                        )
                        .await
                        .map(Some)
                    }
                    Err(err) => Err(AppError::from(err)),
                }
            };

            match outcome {
                Ok(created) => {
                    // Top-level entities go into the report's value.
                    if let Some(created) = created {
                        if segments.len() == 1 {
                            report.value.push(created);
                        }
                    }
                }
                Err(err) => report.fail(item.id, raw_name, err),
            }
        }

        // Top-level folders count as created entities too.
        for (path, folder) in &folders {
            if !path.contains('/') {
                report.value.push(folder.clone());
            }
        }

        self.clear_sizes_upward(Some(parent.id)).await?;
        info!(
            item_id = %item.id,
            created = report.attempted - report.failures.len(),
            failures = report.failures.len(),
            "Archive extracted"
        );
        Ok(report)
    }

    /// Read a file entity's stored bytes for packing.
    async fn pack_file(&self, item: &Item) -> AppResult<Bytes> {
        let Some(file_id) = item.file_id else {
            return Err(AppError::internal(format!(
                "File entity {} has no stored file",
                item.id
            )));
        };
        let path = self.mapper.object_path(file_id)?;
        self.storage.read_bytes(&path).await
    }

    /// Get or create the folder chain for an archive member path.
    async fn ensure_extract_folder(
        &self,
        acting_user: UserId,
        parent: &Item,
        folders: &mut HashMap<String, Item>,
        segments: &[String],
    ) -> AppResult<Item> {
        let mut current = parent.clone();
        let mut key = String::new();
        for segment in segments {
            if !key.is_empty() {
                key.push('/');
            }
            key.push_str(segment);

            if let Some(existing) = folders.get(&key) {
                current = existing.clone();
                continue;
            }
            let folder = match self.store.find_child_by_name(current.id, segment).await? {
                Some(existing) if existing.is_folder() => existing,
                Some(_) => {
                    return Err(AppError::validation(format!(
                        "A file named '{segment}' blocks extraction of a folder"
                    )))
                }
                None => {
                    self.create_folder_locked(acting_user, &current, segment, false)
                        .await?
                }
            };
            folders.insert(key.clone(), folder.clone());
            current = folder;
        }
        Ok(current)
    }

    /// Create a file entity for one archive member.
    async fn extract_file(
        &self,
        acting_user: UserId,
        parent: &Item,
        folders: &mut HashMap<String, Item>,
        segments: &[String],
        data: Bytes,
    ) -> AppResult<Item> {
        let (name, dir_segments) = segments
            .split_last()
            .ok_or_else(|| AppError::validation("Empty member path in archive"))?;
        let container = if dir_segments.is_empty() {
            parent.clone()
        } else {
            self.ensure_extract_folder(acting_user, parent, folders, dir_segments)
                .await?
        };
        self.add_file_locked(acting_user, &container, name, data, true)
            .await
    }
}

fn zip_error(err: zip::result::ZipError) -> AppError {
    AppError::with_source(ErrorKind::Storage, format!("Zip error: {err}"), err)
}
