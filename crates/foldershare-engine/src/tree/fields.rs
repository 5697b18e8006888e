//! Description and extensible-field edits.
//!
//! Callers are responsible for running the field-level policy from
//! `foldershare-access` before invoking these; the engine only enforces
//! locking and persistence.

use foldershare_core::result::AppResult;
use foldershare_core::types::ItemId;
use foldershare_entity::item::Item;

use crate::engine::TreeEngine;

impl TreeEngine {
    /// Set an entity's free-text description.
    pub async fn set_description(&self, item_id: ItemId, description: &str) -> AppResult<Item> {
        let item = self.require_item(item_id).await?;
        let _lock = self.locks.try_lock(item_id)?;
        let mut item = item;
        item.description = description.to_string();
        self.save(item).await
    }

    /// Set (or clear, with `None`) a key in the extensible field bag.
    pub async fn set_field(
        &self,
        item_id: ItemId,
        key: &str,
        value: Option<serde_json::Value>,
    ) -> AppResult<Item> {
        let item = self.require_item(item_id).await?;
        let _lock = self.locks.try_lock(item_id)?;
        let mut item = item;
        match value {
            Some(value) => {
                item.extra.insert(key.to_string(), value);
            }
            None => {
                item.extra.remove(key);
            }
        }
        self.save(item).await
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::testutil::engine;
    use foldershare_core::types::UserId;

    const OWNER: UserId = UserId(1);

    #[tokio::test]
    async fn test_set_description() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let updated = engine
            .set_description(root.id, "my files")
            .await
            .unwrap();
        assert_eq!(updated.description, "my files");
    }

    #[tokio::test]
    async fn test_set_and_clear_extra_field() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();

        let updated = engine
            .set_field(root.id, "color", Some(serde_json::json!("blue")))
            .await
            .unwrap();
        assert_eq!(updated.extra["color"], "blue");

        let updated = engine.set_field(root.id, "color", None).await.unwrap();
        assert!(!updated.extra.contains_key("color"));
    }
}
