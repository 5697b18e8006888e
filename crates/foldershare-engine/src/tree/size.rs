//! Lazy folder size aggregation.

use futures::future::BoxFuture;
use futures::FutureExt;

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::ItemId;
use foldershare_entity::item::Item;

use crate::engine::TreeEngine;

impl TreeEngine {
    /// Mark a folder's size as not yet computed.
    pub async fn clear_size(&self, item_id: ItemId) -> AppResult<Item> {
        let item = self.require_item(item_id).await?;
        if !item.is_folder() {
            return Err(AppError::validation(
                "Only folder sizes can be cleared; file sizes mirror stored content",
            ));
        }
        let _lock = self.locks.try_lock(item_id)?;
        let mut item = item;
        item.size = None;
        self.save(item).await
    }

    /// Compute and persist the size of a folder subtree, lazily.
    ///
    /// Folders with a known size are trusted as-is; only unknown sizes
    /// recurse, so a sweep after unrelated edits stays cheap. Returns the
    /// entity's size in bytes.
    pub fn update_sizes(&self, item_id: ItemId) -> BoxFuture<'_, AppResult<i64>> {
        async move {
            let item = self.require_item(item_id).await?;
            if item.is_file() {
                return Ok(item.size.unwrap_or(0));
            }
            if let Some(size) = item.size {
                return Ok(size);
            }

            let children = self.store.list_children(item.id).await?;
            let mut total: i64 = 0;
            for child in children {
                total += if child.is_folder() {
                    self.update_sizes(child.id).await?
                } else {
                    child.size.unwrap_or(0)
                };
            }

            let mut item = item;
            item.size = Some(total);
            self.store.update(&item).await?;
            Ok(total)
        }
        .boxed()
    }
}
