//! Usage accounting: per-user counters and the reconciliation sweep.

use std::collections::BTreeMap;

use tracing::info;

use foldershare_core::result::AppResult;
use foldershare_core::types::UserId;
use foldershare_entity::item::Item;
use foldershare_entity::usage::{UsageDelta, UserUsage};

use crate::engine::TreeEngine;

/// The usage delta one entity contributes to its owner's counters.
pub(crate) fn entity_delta(item: &Item) -> UsageDelta {
    if item.is_folder() {
        UsageDelta::folder_created(item.is_root())
    } else {
        UsageDelta::file_created(item.size.unwrap_or(0))
    }
}

impl TreeEngine {
    /// A user's usage counters (zeroed if nothing is recorded).
    pub async fn usage_for(&self, user_id: UserId) -> AppResult<UserUsage> {
        self.store.get_usage(user_id).await
    }

    /// Every recorded usage row.
    pub async fn list_usage(&self) -> AppResult<Vec<UserUsage>> {
        self.store.list_usage().await
    }

    /// Recompute every user's counters from the tree itself.
    ///
    /// Repair/reconciliation sweep: the result must equal what the
    /// incremental deltas have maintained. Users with recorded counters
    /// but no remaining entities are reset to zero.
    pub async fn update_usage_all_users(&self) -> AppResult<Vec<UserUsage>> {
        let mut computed: BTreeMap<UserId, UserUsage> = BTreeMap::new();

        // Stale rows get zeroed unless the walk below refills them.
        for row in self.store.list_usage().await? {
            computed.insert(row.user_id, UserUsage::zero(row.user_id));
        }
        for item in self.store.list_all_items().await? {
            let entry = computed
                .entry(item.owner_id)
                .or_insert_with(|| UserUsage::zero(item.owner_id));
            entry.apply(&entity_delta(&item));
        }

        for usage in computed.values() {
            self.store.replace_usage(usage).await?;
        }
        info!(users = computed.len(), "Usage counters recomputed");
        Ok(computed.into_values().collect())
    }
}
