//! Grant mutations on root folders.

use std::collections::BTreeSet;

use tracing::info;

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{ItemId, UserId};
use foldershare_entity::grants::{AccessGrants, GrantLevel};
use foldershare_entity::item::Item;

use crate::engine::TreeEngine;

impl TreeEngine {
    /// Add a grant for a user on a root folder.
    pub async fn add_grant(
        &self,
        root_id: ItemId,
        user_id: UserId,
        level: GrantLevel,
    ) -> AppResult<Item> {
        self.mutate_grants(root_id, |grants, owner| grants.grant(owner, user_id, level))
            .await
    }

    /// Remove a user's grant at the given level from a root folder.
    pub async fn delete_grant(
        &self,
        root_id: ItemId,
        user_id: UserId,
        level: GrantLevel,
    ) -> AppResult<Item> {
        self.mutate_grants(root_id, |grants, owner| {
            grants.revoke(owner, user_id, level);
            Ok(())
        })
        .await
    }

    /// Remove every grant except the owner's implicit view and author.
    pub async fn clear_grants(&self, root_id: ItemId) -> AppResult<Item> {
        self.mutate_grants(root_id, |grants, owner| {
            grants.clear(owner);
            Ok(())
        })
        .await
    }

    /// Replace all three grant sets at once.
    pub async fn set_grants(
        &self,
        root_id: ItemId,
        view: BTreeSet<UserId>,
        author: BTreeSet<UserId>,
        disabled: BTreeSet<UserId>,
    ) -> AppResult<Item> {
        self.mutate_grants(root_id, move |grants, owner| {
            grants.set_all(owner, view, author, disabled)
        })
        .await
    }

    /// Load a root folder, mutate its grants under lock, and save.
    ///
    /// The invariants (owner always present, disabled disjoint from view
    /// and author) are enforced by [`AccessGrants`] on every mutation.
    async fn mutate_grants<F>(&self, root_id: ItemId, mutate: F) -> AppResult<Item>
    where
        F: FnOnce(&mut AccessGrants, UserId) -> AppResult<()>,
    {
        let item = self.require_item(root_id).await?;
        if !item.is_root() {
            return Err(AppError::validation(
                "Grants exist only on root folders; non-root entities resolve access through their root",
            ));
        }
        let _lock = self.locks.try_lock(root_id)?;

        let mut item = item;
        let owner = item.owner_id;
        let mut grants = item.grants.take().unwrap_or_else(|| AccessGrants::new(owner));
        mutate(&mut grants, owner)?;
        item.grants = Some(grants);
        let item = self.save(item).await?;
        info!(root_id = %root_id, "Grants updated");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::testutil::engine;
    use foldershare_core::error::ErrorKind;

    const OWNER: UserId = UserId(1);
    const GUEST: UserId = UserId(2);

    #[tokio::test]
    async fn test_add_and_revoke_grant() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();

        let item = engine
            .add_grant(root.id, GUEST, GrantLevel::Author)
            .await
            .unwrap();
        let grants = item.grants.as_ref().unwrap();
        assert!(grants.is_author(GUEST));
        assert!(grants.invariants_hold(OWNER));

        let item = engine
            .delete_grant(root.id, GUEST, GrantLevel::Author)
            .await
            .unwrap();
        let grants = item.grants.as_ref().unwrap();
        assert!(!grants.is_author(GUEST));
        assert!(grants.is_viewer(GUEST));
    }

    #[tokio::test]
    async fn test_grants_rejected_on_non_root() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let docs = engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();
        let err = engine
            .add_grant(docs.id, GUEST, GrantLevel::View)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_set_grants_enforces_invariants() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();

        let view: BTreeSet<_> = [GUEST].into_iter().collect();
        let author = BTreeSet::new();
        let disabled: BTreeSet<_> = [GUEST].into_iter().collect();
        let item = engine
            .set_grants(root.id, view, author, disabled)
            .await
            .unwrap();
        let grants = item.grants.as_ref().unwrap();
        assert!(grants.is_disabled(GUEST));
        assert!(!grants.is_viewer(GUEST));
        assert!(grants.invariants_hold(OWNER));
    }

    #[tokio::test]
    async fn test_clear_grants_keeps_owner() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        engine
            .add_grant(root.id, GUEST, GrantLevel::View)
            .await
            .unwrap();
        let item = engine.clear_grants(root.id).await.unwrap();
        let grants = item.grants.as_ref().unwrap();
        assert!(!grants.is_viewer(GUEST));
        assert!(grants.is_viewer(OWNER));
        assert!(grants.is_author(OWNER));
    }
}
