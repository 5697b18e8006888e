//! The entity tree engine and its shared helpers.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use foldershare_core::config::sharing::SharingConfig;
use foldershare_core::config::storage::StorageConfig;
use foldershare_core::error::AppError;
use foldershare_core::events::{EventPhase, TreeEvent, TreeEventEnvelope, TreeObserver};
use foldershare_core::result::AppResult;
use foldershare_core::traits::storage::FileStorage;
use foldershare_core::types::{ItemId, UserId};
use foldershare_entity::item::Item;
use foldershare_entity::name::{unique_name, validate_name};
use foldershare_entity::store::EntityStore;
use foldershare_storage::StoragePathMapper;

use crate::lock::LockCoordinator;

/// The entity tree engine.
///
/// Owns the collaborators every tree operation needs: the entity store,
/// the file storage backend, the storage path mapper, the advisory lock
/// table, and the observer list. Operations are spread across the
/// `tree`, `archive`, `resolver`, and `usage` modules as `impl` blocks.
pub struct TreeEngine {
    pub(crate) store: Arc<dyn EntityStore>,
    pub(crate) storage: Arc<dyn FileStorage>,
    pub(crate) mapper: StoragePathMapper,
    pub(crate) locks: LockCoordinator,
    pub(crate) sharing: SharingConfig,
    pub(crate) storage_config: StorageConfig,
    observers: Vec<Arc<dyn TreeObserver>>,
}

impl std::fmt::Debug for TreeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeEngine")
            .field("store", &self.store)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TreeEngine {
    /// Create an engine over the given collaborators.
    pub fn new(
        store: Arc<dyn EntityStore>,
        storage: Arc<dyn FileStorage>,
        mapper: StoragePathMapper,
        sharing: SharingConfig,
        storage_config: StorageConfig,
    ) -> Self {
        Self {
            store,
            storage,
            mapper,
            locks: LockCoordinator::new(),
            sharing,
            storage_config,
            observers: Vec::new(),
        }
    }

    /// Register a synchronous observer. Call before sharing the engine.
    pub fn register_observer(&mut self, observer: Arc<dyn TreeObserver>) {
        self.observers.push(observer);
    }

    /// The entity store behind this engine.
    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    /// The file storage backend behind this engine.
    pub fn storage(&self) -> &Arc<dyn FileStorage> {
        &self.storage
    }

    /// The storage path mapper.
    pub fn mapper(&self) -> &StoragePathMapper {
        &self.mapper
    }

    /// The advisory lock coordinator.
    pub fn locks(&self) -> &LockCoordinator {
        &self.locks
    }

    /// The sharing policy this engine was configured with.
    pub fn sharing(&self) -> &SharingConfig {
        &self.sharing
    }

    /// Notify all observers of an event.
    pub(crate) fn notify(&self, phase: EventPhase, event: TreeEvent) {
        if self.observers.is_empty() {
            return;
        }
        let envelope = TreeEventEnvelope::new(phase, event);
        for observer in &self.observers {
            observer.on_event(&envelope);
        }
    }

    /// Fetch an entity or fail with `NotFound`.
    pub(crate) async fn require_item(&self, id: ItemId) -> AppResult<Item> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Entity {id} not found")))
    }

    /// Fetch an entity and insist it is a folder kind.
    pub(crate) async fn require_folder(&self, id: ItemId) -> AppResult<Item> {
        let item = self.require_item(id).await?;
        if !item.is_folder() {
            return Err(AppError::validation(format!(
                "Entity '{}' is not a folder",
                item.name
            )));
        }
        Ok(item)
    }

    /// The names taken among the direct children of a folder.
    pub(crate) async fn child_names(&self, parent_id: ItemId) -> AppResult<HashSet<String>> {
        let children = self.store.list_children(parent_id).await?;
        Ok(children.into_iter().map(|c| c.name).collect())
    }

    /// The names taken among a user's root folders.
    pub(crate) async fn root_names(&self, owner_id: UserId) -> AppResult<HashSet<String>> {
        let roots = self.store.list_roots(owner_id).await?;
        Ok(roots.into_iter().map(|r| r.name).collect())
    }

    /// Validate a proposed name and resolve collisions against `taken`.
    ///
    /// With `allow_rename`, a collision gets a numeric disambiguator
    /// inserted before the extension; without it, a collision is a
    /// `Validation` error.
    pub(crate) fn resolve_name(
        &self,
        desired: &str,
        taken: &HashSet<String>,
        allow_rename: bool,
    ) -> AppResult<String> {
        validate_name(desired, self.sharing.max_name_length)?;
        if !taken.contains(desired) {
            return Ok(desired.to_string());
        }
        if allow_rename {
            Ok(unique_name(desired, taken))
        } else {
            Err(AppError::validation(format!(
                "An entity named '{desired}' already exists here"
            )))
        }
    }

    /// Persist an entity with a fresh change timestamp.
    pub(crate) async fn save(&self, mut item: Item) -> AppResult<Item> {
        item.changed_at = Utc::now();
        self.notify(
            EventPhase::Before,
            TreeEvent::Saved { item_id: item.id },
        );
        let saved = self.store.update(&item).await?;
        self.notify(
            EventPhase::After,
            TreeEvent::Saved { item_id: saved.id },
        );
        Ok(saved)
    }

    /// Mark the folder sizes above `parent_id` as not-yet-computed.
    ///
    /// Called after any mutation that changes the byte content below a
    /// folder; the next size sweep recomputes lazily.
    pub(crate) async fn clear_sizes_upward(&self, parent_id: Option<ItemId>) -> AppResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        let ancestors = self.store.list_ancestors(parent_id).await?;
        for mut folder in ancestors {
            if folder.is_folder() && folder.size.is_some() {
                folder.size = None;
                folder.changed_at = Utc::now();
                self.store.update(&folder).await?;
            }
        }
        Ok(())
    }
}
