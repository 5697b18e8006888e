//! Per-root-folder access grants.
//!
//! Grants exist only on root folders and cover the whole subtree. Two
//! invariants are enforced on every mutation, not just on read:
//!
//! - the owner is always present in both `view` and `author`;
//! - `disabled` is disjoint from `view` and `author`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::UserId;

/// The access level of a single grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantLevel {
    /// May view the subtree.
    View,
    /// May view and modify the subtree.
    Author,
    /// Access explicitly suspended.
    Disabled,
}

/// The three grant sets recorded on a root folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrants {
    /// Users allowed to view the subtree.
    pub view: BTreeSet<UserId>,
    /// Users allowed to modify the subtree.
    pub author: BTreeSet<UserId>,
    /// Users whose access is suspended.
    pub disabled: BTreeSet<UserId>,
}

impl AccessGrants {
    /// Grants for a freshly created root folder: owner only.
    pub fn new(owner_id: UserId) -> Self {
        let mut grants = Self::default();
        grants.view.insert(owner_id);
        grants.author.insert(owner_id);
        grants
    }

    /// Add a grant for a user at the given level.
    ///
    /// Granting `view` or `author` removes the user from `disabled`;
    /// granting `disabled` removes the user from `view` and `author`.
    /// The owner can never be disabled.
    pub fn grant(&mut self, owner_id: UserId, user_id: UserId, level: GrantLevel) -> AppResult<()> {
        match level {
            GrantLevel::View => {
                self.disabled.remove(&user_id);
                self.view.insert(user_id);
            }
            GrantLevel::Author => {
                self.disabled.remove(&user_id);
                self.view.insert(user_id);
                self.author.insert(user_id);
            }
            GrantLevel::Disabled => {
                if user_id == owner_id {
                    return Err(AppError::validation("The owner's access cannot be disabled"));
                }
                self.view.remove(&user_id);
                self.author.remove(&user_id);
                self.disabled.insert(user_id);
            }
        }
        self.restore_owner(owner_id);
        Ok(())
    }

    /// Remove a user's grant at the given level.
    ///
    /// Removing the owner's `view` or `author` grant is a no-op: the owner
    /// is implicitly present in both.
    pub fn revoke(&mut self, owner_id: UserId, user_id: UserId, level: GrantLevel) {
        match level {
            GrantLevel::View => {
                self.view.remove(&user_id);
                self.author.remove(&user_id);
            }
            GrantLevel::Author => {
                self.author.remove(&user_id);
            }
            GrantLevel::Disabled => {
                self.disabled.remove(&user_id);
            }
        }
        self.restore_owner(owner_id);
    }

    /// Remove all grants except the owner's implicit view+author.
    pub fn clear(&mut self, owner_id: UserId) {
        self.view.clear();
        self.author.clear();
        self.disabled.clear();
        self.restore_owner(owner_id);
    }

    /// Replace all three sets at once, then re-normalize the invariants.
    pub fn set_all(
        &mut self,
        owner_id: UserId,
        view: BTreeSet<UserId>,
        author: BTreeSet<UserId>,
        disabled: BTreeSet<UserId>,
    ) -> AppResult<()> {
        if disabled.contains(&owner_id) {
            return Err(AppError::validation("The owner's access cannot be disabled"));
        }
        self.view = view;
        self.author = author;
        self.disabled = disabled;
        // Authors can always view; disabled wins over stale view/author entries.
        for user in self.author.clone() {
            self.view.insert(user);
        }
        for user in self.disabled.clone() {
            self.view.remove(&user);
            self.author.remove(&user);
        }
        self.restore_owner(owner_id);
        Ok(())
    }

    /// Whether the user holds a view grant.
    pub fn is_viewer(&self, user_id: UserId) -> bool {
        self.view.contains(&user_id)
    }

    /// Whether the user holds an author grant.
    pub fn is_author(&self, user_id: UserId) -> bool {
        self.author.contains(&user_id)
    }

    /// Whether the user's access is suspended.
    pub fn is_disabled(&self, user_id: UserId) -> bool {
        self.disabled.contains(&user_id)
    }

    /// Whether both invariants currently hold for the given owner.
    pub fn invariants_hold(&self, owner_id: UserId) -> bool {
        self.view.contains(&owner_id)
            && self.author.contains(&owner_id)
            && self.disabled.is_disjoint(&self.view)
            && self.disabled.is_disjoint(&self.author)
    }

    fn restore_owner(&mut self, owner_id: UserId) {
        self.disabled.remove(&owner_id);
        self.view.insert(owner_id);
        self.author.insert(owner_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: UserId = UserId(1);
    const ALICE: UserId = UserId(2);
    const BOB: UserId = UserId(3);

    #[test]
    fn test_new_contains_owner() {
        let grants = AccessGrants::new(OWNER);
        assert!(grants.is_viewer(OWNER));
        assert!(grants.is_author(OWNER));
        assert!(grants.invariants_hold(OWNER));
    }

    #[test]
    fn test_disable_removes_view_and_author() {
        let mut grants = AccessGrants::new(OWNER);
        grants.grant(OWNER, ALICE, GrantLevel::Author).unwrap();
        grants.grant(OWNER, ALICE, GrantLevel::Disabled).unwrap();
        assert!(!grants.is_viewer(ALICE));
        assert!(!grants.is_author(ALICE));
        assert!(grants.is_disabled(ALICE));
        assert!(grants.invariants_hold(OWNER));
    }

    #[test]
    fn test_grant_removes_disabled() {
        let mut grants = AccessGrants::new(OWNER);
        grants.grant(OWNER, ALICE, GrantLevel::Disabled).unwrap();
        grants.grant(OWNER, ALICE, GrantLevel::View).unwrap();
        assert!(grants.is_viewer(ALICE));
        assert!(!grants.is_disabled(ALICE));
        assert!(grants.invariants_hold(OWNER));
    }

    #[test]
    fn test_owner_cannot_be_disabled() {
        let mut grants = AccessGrants::new(OWNER);
        assert!(grants.grant(OWNER, OWNER, GrantLevel::Disabled).is_err());
        assert!(grants.invariants_hold(OWNER));
    }

    #[test]
    fn test_revoke_keeps_owner() {
        let mut grants = AccessGrants::new(OWNER);
        grants.revoke(OWNER, OWNER, GrantLevel::View);
        assert!(grants.is_viewer(OWNER));
        assert!(grants.is_author(OWNER));
    }

    #[test]
    fn test_author_implies_view() {
        let mut grants = AccessGrants::new(OWNER);
        grants.grant(OWNER, BOB, GrantLevel::Author).unwrap();
        assert!(grants.is_viewer(BOB));
    }

    #[test]
    fn test_set_all_normalizes() {
        let mut grants = AccessGrants::new(OWNER);
        let view: BTreeSet<_> = [ALICE, BOB].into_iter().collect();
        let author: BTreeSet<_> = [BOB].into_iter().collect();
        let disabled: BTreeSet<_> = [ALICE].into_iter().collect();
        grants.set_all(OWNER, view, author, disabled).unwrap();
        assert!(!grants.is_viewer(ALICE));
        assert!(grants.is_disabled(ALICE));
        assert!(grants.is_viewer(BOB));
        assert!(grants.invariants_hold(OWNER));
    }

    #[test]
    fn test_set_all_rejects_disabled_owner() {
        let mut grants = AccessGrants::new(OWNER);
        let disabled: BTreeSet<_> = [OWNER].into_iter().collect();
        assert!(grants
            .set_all(OWNER, BTreeSet::new(), BTreeSet::new(), disabled)
            .is_err());
    }

    #[test]
    fn test_clear_keeps_owner_only() {
        let mut grants = AccessGrants::new(OWNER);
        grants.grant(OWNER, ALICE, GrantLevel::View).unwrap();
        grants.grant(OWNER, BOB, GrantLevel::Disabled).unwrap();
        grants.clear(OWNER);
        assert_eq!(grants.view.len(), 1);
        assert_eq!(grants.author.len(), 1);
        assert!(grants.disabled.is_empty());
        assert!(grants.invariants_hold(OWNER));
    }
}
