//! Tree events and the synchronous observer seam.
//!
//! FolderShare replaces implicit framework hooks with an explicit observer
//! list registered on the entity tree engine. Observers are invoked
//! synchronously at defined extension points so side effects such as search
//! indexing are visible dependencies of the engine, not ambient magic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ItemId, UserId};

/// Extension point at which an observer is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    /// Before the mutation is written to the store.
    Before,
    /// After the mutation has been written to the store.
    After,
}

/// Events emitted by the entity tree engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TreeEvent {
    /// An entity was created.
    Created {
        /// The new entity.
        item_id: ItemId,
        /// Its parent, if any.
        parent_id: Option<ItemId>,
        /// Its owner.
        owner_id: UserId,
        /// Its name.
        name: String,
    },
    /// An entity's fields were saved (rename, move, description edit).
    Saved {
        /// The entity that was saved.
        item_id: ItemId,
    },
    /// An entity was deleted.
    Deleted {
        /// The deleted entity.
        item_id: ItemId,
        /// Its owner at deletion time.
        owner_id: UserId,
        /// Its name at deletion time.
        name: String,
    },
    /// An entity's owner changed.
    OwnerChanged {
        /// The entity whose owner changed.
        item_id: ItemId,
        /// The previous owner.
        old_owner_id: UserId,
        /// The new owner.
        new_owner_id: UserId,
    },
}

/// Wrapper carrying an event with its timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEventEnvelope {
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The extension point.
    pub phase: EventPhase,
    /// The event payload.
    pub event: TreeEvent,
}

impl TreeEventEnvelope {
    /// Create a new envelope stamped with the current time.
    pub fn new(phase: EventPhase, event: TreeEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            phase,
            event,
        }
    }
}

/// A synchronous observer of tree mutations.
pub trait TreeObserver: Send + Sync + 'static {
    /// Called at each extension point. Observers must not fail; anything
    /// that can fail belongs in the operation itself.
    fn on_event(&self, envelope: &TreeEventEnvelope);
}
