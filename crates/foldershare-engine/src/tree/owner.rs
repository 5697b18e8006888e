//! Ownership changes, single and recursive.

use tracing::info;

use foldershare_core::events::{EventPhase, TreeEvent};
use foldershare_core::result::AppResult;
use foldershare_core::types::{ItemId, UserId};
use foldershare_entity::grants::GrantLevel;
use foldershare_entity::item::Item;

use crate::engine::TreeEngine;
use crate::report::BulkReport;
use crate::usage::entity_delta;

impl TreeEngine {
    /// Change the owner of a single entity.
    ///
    /// Usage moves from the old owner to the new one for this entity
    /// alone. On a root folder, the new owner is added to the grants so
    /// the owner-always-present invariant keeps holding.
    pub async fn change_owner(&self, item_id: ItemId, new_owner: UserId) -> AppResult<Item> {
        let item = self.require_item(item_id).await?;
        let _lock = self.locks.try_lock(item_id)?;
        self.change_owner_locked(item, new_owner).await
    }

    /// Change the owner of an entity and its whole subtree.
    ///
    /// Descendants are processed pre-order, each locked as it is reached;
    /// a failed lock skips that entity, the sweep keeps going, and the
    /// report lists everything that could not be changed. The returned
    /// value is the number of entities whose owner changed.
    pub async fn change_owner_recursive(
        &self,
        item_id: ItemId,
        new_owner: UserId,
    ) -> AppResult<BulkReport<usize>> {
        let item = self.require_item(item_id).await?;
        let descendants = self.store.list_descendants(item.id).await?;

        let mut report = BulkReport::new(0usize);
        for entity in std::iter::once(item).chain(descendants) {
            report.attempt();
            let entity_id = entity.id;
            let entity_name = entity.name.clone();
            let outcome = match self.locks.try_lock(entity_id) {
                Ok(_guard) => self.change_owner_locked(entity, new_owner).await.map(|_| ()),
                Err(err) => Err(err),
            };
            match outcome {
                Ok(()) => report.value += 1,
                Err(err) => report.fail(entity_id, entity_name, err),
            }
        }
        info!(
            item_id = %item_id,
            new_owner = %new_owner,
            changed = report.value,
            failures = report.failures.len(),
            "Recursive owner change finished"
        );
        Ok(report)
    }

    /// Ownership change body; the entity's lock must already be held.
    async fn change_owner_locked(&self, item: Item, new_owner: UserId) -> AppResult<Item> {
        let old_owner = item.owner_id;
        if old_owner == new_owner {
            return Ok(item);
        }

        let delta = entity_delta(&item);
        let mut item = item;
        item.owner_id = new_owner;
        if let Some(grants) = item.grants.as_mut() {
            grants.grant(new_owner, new_owner, GrantLevel::Author)?;
        }

        self.notify(
            EventPhase::Before,
            TreeEvent::OwnerChanged {
                item_id: item.id,
                old_owner_id: old_owner,
                new_owner_id: new_owner,
            },
        );
        let item = self.save(item).await?;
        self.store
            .apply_usage_delta(old_owner, &delta.negated())
            .await?;
        self.store.apply_usage_delta(new_owner, &delta).await?;
        self.notify(
            EventPhase::After,
            TreeEvent::OwnerChanged {
                item_id: item.id,
                old_owner_id: old_owner,
                new_owner_id: new_owner,
            },
        );
        Ok(item)
    }
}
