//! In-process advisory locks over entity ids.
//!
//! Locks are exclusive, non-blocking, and guard-scoped: acquisition either
//! succeeds immediately or fails with `ErrorKind::Lock`, and release
//! happens when the guard drops. Multi-item acquisition takes ids in
//! ascending order so concurrent multi-item operations cannot deadlock,
//! and rolls back already-acquired locks if any acquisition fails.

use std::sync::Arc;

use dashmap::DashMap;

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::ItemId;

/// Coordinates exclusive advisory locks on entities.
#[derive(Debug, Clone, Default)]
pub struct LockCoordinator {
    table: Arc<DashMap<ItemId, ()>>,
}

impl LockCoordinator {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to acquire an exclusive lock on one entity.
    ///
    /// An unavailable lock is a terminal error for this attempt, never a
    /// queued wait; callers may retry at a higher level.
    pub fn try_lock(&self, id: ItemId) -> AppResult<LockGuard> {
        match self.table.entry(id) {
            dashmap::Entry::Occupied(_) => Err(AppError::lock(format!(
                "Entity {id} is locked by another operation"
            ))),
            dashmap::Entry::Vacant(entry) => {
                entry.insert(());
                Ok(LockGuard {
                    table: Arc::clone(&self.table),
                    id,
                })
            }
        }
    }

    /// Acquire locks on all given entities, or none.
    ///
    /// Ids are deduplicated and taken in ascending order. On the first
    /// failed acquisition, guards already taken are dropped (released)
    /// before the error is returned.
    pub fn try_lock_all(&self, ids: &[ItemId]) -> AppResult<Vec<LockGuard>> {
        let mut sorted: Vec<ItemId> = ids.to_vec();
        sorted.sort();
        sorted.dedup();

        let mut guards = Vec::with_capacity(sorted.len());
        for id in sorted {
            match self.try_lock(id) {
                Ok(guard) => guards.push(guard),
                Err(err) => {
                    drop(guards);
                    return Err(err);
                }
            }
        }
        Ok(guards)
    }

    /// Whether an entity is currently locked.
    pub fn is_locked(&self, id: ItemId) -> bool {
        self.table.contains_key(&id)
    }
}

/// RAII guard for one held entity lock.
#[derive(Debug)]
pub struct LockGuard {
    table: Arc<DashMap<ItemId, ()>>,
    id: ItemId,
}

impl LockGuard {
    /// The entity this guard locks.
    pub fn id(&self) -> ItemId {
        self.id
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.table.remove(&self.id);
    }
}
