//! Persistence seam for the entity tree.
//!
//! The engine talks to an [`EntityStore`]; implementations live in
//! `foldershare-database` (PostgreSQL and in-memory). The store is expected
//! to support atomic single-row read-modify-write; multi-entity atomicity
//! is the job of the advisory lock coordinator, not the store.

use async_trait::async_trait;

use foldershare_core::result::AppResult;
use foldershare_core::types::{ItemId, UserId};

use crate::item::{CreateItem, Item};
use crate::usage::{UsageDelta, UserUsage};

/// Entity CRUD plus the tree and usage queries the engine needs.
///
/// Ordering contracts callers rely on:
///
/// - [`list_children`](Self::list_children), [`list_roots`](Self::list_roots)
///   and [`list_all_roots`](Self::list_all_roots) return siblings in
///   ascending name order (ties broken by id);
/// - [`list_descendants`](Self::list_descendants) returns pre-order
///   depth-first (every parent before its children), excluding the item
///   itself;
/// - [`list_ancestors`](Self::list_ancestors) returns root-to-leaf,
///   including the item itself as the last element.
#[async_trait]
pub trait EntityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find an entity by id.
    async fn find_by_id(&self, id: ItemId) -> AppResult<Option<Item>>;

    /// Find a direct child of `parent_id` by exact name.
    async fn find_child_by_name(&self, parent_id: ItemId, name: &str)
        -> AppResult<Option<Item>>;

    /// Find a root folder owned by `owner_id` by exact name.
    ///
    /// Root-folder names are unique per owner, not globally.
    async fn find_root_by_name(&self, owner_id: UserId, name: &str) -> AppResult<Option<Item>>;

    /// List the direct children of a folder.
    async fn list_children(&self, parent_id: ItemId) -> AppResult<Vec<Item>>;

    /// List the root folders owned by a user.
    async fn list_roots(&self, owner_id: UserId) -> AppResult<Vec<Item>>;

    /// List every root folder in the system.
    async fn list_all_roots(&self) -> AppResult<Vec<Item>>;

    /// List all transitive descendants of an entity, pre-order.
    async fn list_descendants(&self, id: ItemId) -> AppResult<Vec<Item>>;

    /// List the ancestor chain of an entity, root first, self last.
    async fn list_ancestors(&self, id: ItemId) -> AppResult<Vec<Item>>;

    /// Count the direct children of a folder.
    async fn count_children(&self, parent_id: ItemId) -> AppResult<u64>;

    /// List every entity in the system (reconciliation sweeps only).
    async fn list_all_items(&self) -> AppResult<Vec<Item>>;

    /// Create a new entity; the store assigns the id and timestamps.
    async fn create(&self, data: &CreateItem) -> AppResult<Item>;

    /// Persist all fields of an existing entity.
    async fn update(&self, item: &Item) -> AppResult<Item>;

    /// Delete a single entity row. Returns `true` if a row was deleted.
    ///
    /// Cascading deletion of descendants is driven by the engine so that
    /// usage accounting and per-entity events stay correct.
    async fn delete(&self, id: ItemId) -> AppResult<bool>;

    /// Get a user's usage counters (zeroed if none recorded).
    async fn get_usage(&self, user_id: UserId) -> AppResult<UserUsage>;

    /// Apply a delta to a user's usage counters.
    async fn apply_usage_delta(&self, user_id: UserId, delta: &UsageDelta) -> AppResult<()>;

    /// Replace a user's usage counters wholesale.
    async fn replace_usage(&self, usage: &UserUsage) -> AppResult<()>;

    /// List every recorded usage row.
    async fn list_usage(&self) -> AppResult<Vec<UserUsage>>;
}
