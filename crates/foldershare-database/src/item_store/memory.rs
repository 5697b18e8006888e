//! In-memory entity store.
//!
//! Backs tests and the `memory` database backend. Single-row operations are
//! atomic per dashmap shard; the engine's advisory locks provide the
//! multi-entity discipline, same as with the PostgreSQL store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{ItemId, UserId};
use foldershare_entity::item::{CreateItem, Item};
use foldershare_entity::store::EntityStore;
use foldershare_entity::usage::{UsageDelta, UserUsage};

/// Dashmap-backed entity store.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    items: DashMap<ItemId, Item>,
    usage: DashMap<UserId, UserUsage>,
    next_id: AtomicI64,
}

impl MemoryEntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            usage: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn sorted_by_name(mut items: Vec<Item>) -> Vec<Item> {
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        items
    }

    fn children_of(&self, parent_id: ItemId) -> Vec<Item> {
        let children: Vec<Item> = self
            .items
            .iter()
            .filter(|entry| entry.value().parent_id == Some(parent_id))
            .map(|entry| entry.value().clone())
            .collect();
        Self::sorted_by_name(children)
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn find_by_id(&self, id: ItemId) -> AppResult<Option<Item>> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_child_by_name(
        &self,
        parent_id: ItemId,
        name: &str,
    ) -> AppResult<Option<Item>> {
        Ok(self
            .items
            .iter()
            .find(|entry| {
                entry.value().parent_id == Some(parent_id) && entry.value().name == name
            })
            .map(|entry| entry.value().clone()))
    }

    async fn find_root_by_name(&self, owner_id: UserId, name: &str) -> AppResult<Option<Item>> {
        Ok(self
            .items
            .iter()
            .find(|entry| {
                let item = entry.value();
                item.parent_id.is_none() && item.owner_id == owner_id && item.name == name
            })
            .map(|entry| entry.value().clone()))
    }

    async fn list_children(&self, parent_id: ItemId) -> AppResult<Vec<Item>> {
        Ok(self.children_of(parent_id))
    }

    async fn list_roots(&self, owner_id: UserId) -> AppResult<Vec<Item>> {
        let roots: Vec<Item> = self
            .items
            .iter()
            .filter(|entry| {
                entry.value().parent_id.is_none() && entry.value().owner_id == owner_id
            })
            .map(|entry| entry.value().clone())
            .collect();
        Ok(Self::sorted_by_name(roots))
    }

    async fn list_all_roots(&self) -> AppResult<Vec<Item>> {
        let roots: Vec<Item> = self
            .items
            .iter()
            .filter(|entry| entry.value().parent_id.is_none())
            .map(|entry| entry.value().clone())
            .collect();
        Ok(Self::sorted_by_name(roots))
    }

    async fn list_descendants(&self, id: ItemId) -> AppResult<Vec<Item>> {
        // Iterative pre-order: pop a folder, push its children, visit in
        // name order.
        let mut result = Vec::new();
        let mut stack: Vec<Item> = self.children_of(id).into_iter().rev().collect();
        while let Some(item) = stack.pop() {
            let item_id = item.id;
            result.push(item);
            for child in self.children_of(item_id).into_iter().rev() {
                stack.push(child);
            }
        }
        Ok(result)
    }

    async fn list_ancestors(&self, id: ItemId) -> AppResult<Vec<Item>> {
        let mut chain = Vec::new();
        let mut current = self
            .items
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Entity {id} not found")))?;
        loop {
            chain.push(current.clone());
            match current.parent_id {
                Some(parent_id) => {
                    current = self
                        .items
                        .get(&parent_id)
                        .map(|entry| entry.value().clone())
                        .ok_or_else(|| {
                            AppError::internal(format!(
                                "Entity {id} references missing parent {parent_id}"
                            ))
                        })?;
                }
                None => break,
            }
        }
        chain.reverse();
        Ok(chain)
    }

    async fn count_children(&self, parent_id: ItemId) -> AppResult<u64> {
        Ok(self
            .items
            .iter()
            .filter(|entry| entry.value().parent_id == Some(parent_id))
            .count() as u64)
    }

    async fn list_all_items(&self) -> AppResult<Vec<Item>> {
        let mut items: Vec<Item> = self
            .items
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    async fn create(&self, data: &CreateItem) -> AppResult<Item> {
        let id = ItemId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let now = Utc::now();
        let item = Item {
            id,
            kind: data.kind,
            name: data.name.clone(),
            parent_id: data.parent_id,
            root_id: data.root_id.unwrap_or(id),
            owner_id: data.owner_id,
            size: data.size,
            created_at: now,
            changed_at: now,
            description: data.description.clone(),
            file_id: data.file_id,
            grants: data.grants.clone(),
            extra: serde_json::Map::new(),
        };
        self.items.insert(id, item.clone());
        Ok(item)
    }

    async fn update(&self, item: &Item) -> AppResult<Item> {
        match self.items.get_mut(&item.id) {
            Some(mut entry) => {
                let mut updated = item.clone();
                updated.changed_at = Utc::now();
                *entry.value_mut() = updated.clone();
                Ok(updated)
            }
            None => Err(AppError::not_found(format!(
                "Entity {} not found",
                item.id
            ))),
        }
    }

    async fn delete(&self, id: ItemId) -> AppResult<bool> {
        Ok(self.items.remove(&id).is_some())
    }

    async fn get_usage(&self, user_id: UserId) -> AppResult<UserUsage> {
        Ok(self
            .usage
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| UserUsage::zero(user_id)))
    }

    async fn apply_usage_delta(&self, user_id: UserId, delta: &UsageDelta) -> AppResult<()> {
        self.usage
            .entry(user_id)
            .or_insert_with(|| UserUsage::zero(user_id))
            .apply(delta);
        Ok(())
    }

    async fn replace_usage(&self, usage: &UserUsage) -> AppResult<()> {
        self.usage.insert(usage.user_id, usage.clone());
        Ok(())
    }

    async fn list_usage(&self) -> AppResult<Vec<UserUsage>> {
        let mut rows: Vec<UserUsage> = self
            .usage
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.user_id);
        Ok(rows)
    }
}
