//! Deep-copying subtrees.
//!
//! Copies are owned by the acting user, not the original owner: copying
//! shared content produces the copier's own data inside their namespace.
//! Per-child failures do not abort the copy; the operation finishes what
//! it can and reports the rest.

use tracing::info;

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{FileId, ItemId, UserId};
use foldershare_entity::grants::AccessGrants;
use foldershare_entity::item::{CreateItem, Item, ItemKind};
use foldershare_entity::usage::UsageDelta;

use crate::engine::TreeEngine;
use crate::report::BulkReport;

impl TreeEngine {
    /// Deep-copy an entity under a destination folder.
    ///
    /// `adjust_name` auto-disambiguates a top-level collision; without it
    /// a collision is a `Validation` error. Children are copied pre-order,
    /// sorted by name; a failed folder copy skips its subtree.
    pub async fn copy_to_folder(
        &self,
        acting_user: UserId,
        item_id: ItemId,
        dest_parent_id: ItemId,
        adjust_name: bool,
        new_name: Option<&str>,
    ) -> AppResult<BulkReport<Item>> {
        let item = self.require_item(item_id).await?;
        let dest = self.require_folder(dest_parent_id).await?;

        let dest_ancestors = self.store.list_ancestors(dest.id).await?;
        if dest_ancestors.iter().any(|a| a.id == item.id) {
            return Err(AppError::validation(
                "Cannot copy an entity into one of its own descendants",
            ));
        }

        let descendants = self.store.list_descendants(item.id).await?;
        let mut lock_ids: Vec<ItemId> = vec![item.id, dest.id];
        lock_ids.extend(descendants.iter().filter(|d| d.is_folder()).map(|d| d.id));
        let _locks = self.locks.try_lock_all(&lock_ids)?;

        let taken = self.child_names(dest.id).await?;
        let name = self.resolve_name(new_name.unwrap_or(&item.name), &taken, adjust_name)?;

        let report = self.copy_tree(acting_user, &item, Some(&dest), name).await?;
        self.clear_sizes_upward(Some(dest.id)).await?;
        info!(
            source_id = %item.id,
            copy_id = %report.value.id,
            failures = report.failures.len(),
            "Subtree copied"
        );
        Ok(report)
    }

    /// Deep-copy a folder as a new root folder owned by the acting user.
    pub async fn copy_to_root(
        &self,
        acting_user: UserId,
        item_id: ItemId,
        adjust_name: bool,
        new_name: Option<&str>,
    ) -> AppResult<BulkReport<Item>> {
        let item = self.require_item(item_id).await?;
        if !item.is_folder() {
            return Err(AppError::validation(
                "Only folders can be copied to the top level",
            ));
        }

        let descendants = self.store.list_descendants(item.id).await?;
        let mut lock_ids: Vec<ItemId> = vec![item.id];
        lock_ids.extend(descendants.iter().filter(|d| d.is_folder()).map(|d| d.id));
        let _locks = self.locks.try_lock_all(&lock_ids)?;

        let taken = self.root_names(acting_user).await?;
        let name = self.resolve_name(new_name.unwrap_or(&item.name), &taken, adjust_name)?;

        let report = self.copy_tree(acting_user, &item, None, name).await?;
        info!(
            source_id = %item.id,
            copy_id = %report.value.id,
            failures = report.failures.len(),
            "Subtree copied to a new root"
        );
        Ok(report)
    }

    /// Copy an entity next to itself with an auto-disambiguated name.
    pub async fn duplicate(
        &self,
        acting_user: UserId,
        item_id: ItemId,
    ) -> AppResult<BulkReport<Item>> {
        let item = self.require_item(item_id).await?;
        match item.parent_id {
            Some(parent_id) => {
                self.copy_to_folder(acting_user, item_id, parent_id, true, None)
                    .await
            }
            None => self.copy_to_root(acting_user, item_id, true, None).await,
        }
    }

    /// Copy `src` (and its subtree, for folders) under `top_parent`.
    ///
    /// The top copy failing is a hard error; child failures are recorded
    /// and their subtrees skipped.
    async fn copy_tree(
        &self,
        acting_user: UserId,
        src: &Item,
        top_parent: Option<&Item>,
        top_name: String,
    ) -> AppResult<BulkReport<Item>> {
        let top = self
            .copy_one(
                acting_user,
                src,
                top_parent.map(|p| p.id),
                top_parent.map(|p| p.root_id),
                top_name,
            )
            .await?;
        let top_root = top.root_id;
        let mut report = BulkReport::new(top.clone());
        report.attempt();

        if !src.is_folder() {
            return Ok(report);
        }

        // Pre-order walk; children come back name-sorted from the store.
        let mut stack: Vec<(Item, ItemId)> = Vec::new();
        let children = self.store.list_children(src.id).await?;
        for child in children.into_iter().rev() {
            stack.push((child, top.id));
        }

        while let Some((child, new_parent_id)) = stack.pop() {
            report.attempt();
            match self
                .copy_one(
                    acting_user,
                    &child,
                    Some(new_parent_id),
                    Some(top_root),
                    child.name.clone(),
                )
                .await
            {
                Ok(copy) => {
                    if child.is_folder() {
                        let grandchildren = self.store.list_children(child.id).await?;
                        for grandchild in grandchildren.into_iter().rev() {
                            stack.push((grandchild, copy.id));
                        }
                    }
                }
                Err(err) => report.fail(child.id, child.name.clone(), err),
            }
        }
        Ok(report)
    }

    /// Copy a single entity, including its stored bytes for file kinds.
    async fn copy_one(
        &self,
        acting_user: UserId,
        src: &Item,
        new_parent_id: Option<ItemId>,
        new_root_id: Option<ItemId>,
        name: String,
    ) -> AppResult<Item> {
        let kind = match (src.kind, new_parent_id) {
            (k, Some(_)) if k.is_folder() => ItemKind::Folder,
            (k, None) if k.is_folder() => ItemKind::RootFolder,
            (k, _) => k,
        };
        let is_root = new_parent_id.is_none();

        let mut item = self
            .store
            .create(&CreateItem {
                kind,
                name,
                parent_id: new_parent_id,
                root_id: if is_root { None } else { new_root_id },
                owner_id: acting_user,
                size: if src.is_file() { src.size } else { None },
                description: src.description.clone(),
                file_id: None,
                grants: is_root.then(|| AccessGrants::new(acting_user)),
            })
            .await?;

        if !src.extra.is_empty() {
            item.extra = src.extra.clone();
            item = self.store.update(&item).await?;
        }

        if src.is_file() {
            let Some(src_file_id) = src.file_id else {
                let _ = self.store.delete(item.id).await;
                return Err(AppError::internal(format!(
                    "File entity {} has no stored file",
                    src.id
                )));
            };
            let from = self.mapper.object_path(src_file_id)?;
            let file_id = FileId(item.id.0);
            let to = self.mapper.object_path(file_id)?;
            if let Err(err) = self.storage.copy(&from, &to).await {
                let _ = self.store.delete(item.id).await;
                return Err(err);
            }
            item.file_id = Some(file_id);
            item = self.store.update(&item).await?;
            self.store
                .apply_usage_delta(
                    acting_user,
                    &UsageDelta::file_created(src.size.unwrap_or(0)),
                )
                .await?;
        } else {
            self.store
                .apply_usage_delta(acting_user, &UsageDelta::folder_created(is_root))
                .await?;
        }
        Ok(item)
    }
}
