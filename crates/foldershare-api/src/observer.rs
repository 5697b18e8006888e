//! Tracing observer wired onto the engine by the server.

use foldershare_core::events::{EventPhase, TreeEvent, TreeEventEnvelope, TreeObserver};

/// Logs every post-mutation tree event as a structured tracing event.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl TreeObserver for TracingObserver {
    fn on_event(&self, envelope: &TreeEventEnvelope) {
        if envelope.phase != EventPhase::After {
            return;
        }
        match &envelope.event {
            TreeEvent::Created {
                item_id,
                parent_id,
                owner_id,
                name,
            } => tracing::info!(
                %item_id, ?parent_id, %owner_id, name = %name, "tree.created"
            ),
            TreeEvent::Saved { item_id } => tracing::debug!(%item_id, "tree.saved"),
            TreeEvent::Deleted {
                item_id,
                owner_id,
                name,
            } => tracing::info!(%item_id, %owner_id, name = %name, "tree.deleted"),
            TreeEvent::OwnerChanged {
                item_id,
                old_owner_id,
                new_owner_id,
            } => tracing::info!(
                %item_id, %old_owner_id, %new_owner_id, "tree.owner_changed"
            ),
        }
    }
}
