//! Pure access decision function.
//!
//! Decision order (short-circuiting):
//! 1. Sharing gate: `share` is denied site-wide when sharing is off, even
//!    for administrators.
//! 2. Admin override.
//! 3. Ownership change is administrator-only.
//! 4. Role permission for the operation.
//! 5. Ownership of the target entity.
//! 6. Grant on the target's root folder, gated by the sharing toggles.

use foldershare_core::config::sharing::SharingConfig;
use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::ItemId;
use foldershare_entity::item::Item;

use crate::actor::Actor;

/// The operation being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOp {
    /// View the entity or list its children.
    View,
    /// Modify the entity (rename, move, description, size).
    Update,
    /// Delete the entity and its subtree.
    Delete,
    /// Change the grants on a root folder.
    Share,
    /// Change the entity's owner.
    Chown,
    /// Create a child under `parent_id`; `None` means a new root folder.
    Create {
        /// The destination parent, or `None` for a new root folder.
        parent_id: Option<ItemId>,
    },
}

impl AccessOp {
    /// Short name used in deny reasons and log events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Share => "share",
            Self::Chown => "chown",
            Self::Create { parent_id: None } => "create-root",
            Self::Create { parent_id: Some(_) } => "create",
        }
    }
}

/// Where an allow decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    /// Site administrator override.
    Admin,
    /// Role permission alone was sufficient (creating a root folder).
    Role,
    /// The actor owns the entity.
    Owner,
    /// A grant on the root folder.
    Grant,
}

/// Outcome of an access decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The operation is permitted.
    Allow(DecisionSource),
    /// The operation is denied, with a reason.
    Deny(&'static str),
}

impl Decision {
    /// Whether the operation is permitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// Convert a deny into `ErrorKind::Forbidden`.
    pub fn require(self) -> AppResult<()> {
        match self {
            Self::Allow(_) => Ok(()),
            Self::Deny(reason) => Err(AppError::forbidden(reason)),
        }
    }
}

/// Decide whether `actor` may perform `op` on `item`.
///
/// `item` is the target entity, or `None` when creating a root folder.
/// `root` is the target's root folder for grant evaluation; it may be
/// omitted when the target is itself a root folder. The function is pure:
/// all state it consults arrives as arguments.
pub fn decide(
    actor: &Actor,
    op: AccessOp,
    item: Option<&Item>,
    root: Option<&Item>,
    policy: &SharingConfig,
) -> Decision {
    // Sharing gate first: it binds administrators too.
    if op == AccessOp::Share && !policy.sharing_enabled {
        return Decision::Deny("sharing is disabled site-wide");
    }

    if actor.is_admin() {
        return Decision::Allow(DecisionSource::Admin);
    }

    if op == AccessOp::Chown {
        return Decision::Deny("only administrators may change ownership");
    }

    let has_role = match op {
        AccessOp::View => actor.permissions.can_view,
        AccessOp::Update | AccessOp::Delete => actor.permissions.can_author,
        AccessOp::Share | AccessOp::Create { parent_id: None } => actor.permissions.can_share,
        AccessOp::Create { parent_id: Some(_) } => actor.permissions.can_author,
        AccessOp::Chown => false,
    };
    if !has_role {
        return Decision::Deny("missing role permission for this operation");
    }

    // Creating a root folder has no target entity; the role suffices.
    let Some(item) = item else {
        return Decision::Allow(DecisionSource::Role);
    };

    if actor.is_user(item.owner_id) {
        return Decision::Allow(DecisionSource::Owner);
    }

    // Non-owner access goes through the root folder's grants.
    if !policy.sharing_enabled {
        return Decision::Deny("sharing is disabled site-wide");
    }
    if actor.is_anonymous() && !policy.anonymous_sharing_enabled {
        return Decision::Deny("anonymous sharing is disabled");
    }

    let root_item = root.or(if item.is_root() { Some(item) } else { None });
    let Some(root_item) = root_item else {
        return Decision::Deny("the entity's root folder is not available");
    };

    let grants = root_item.grants_or_default();
    let grant_id = actor.grant_id();
    if grants.is_disabled(grant_id) {
        return Decision::Deny("access to this root folder is disabled for this user");
    }

    let granted = match op {
        AccessOp::View => grants.is_viewer(grant_id),
        AccessOp::Update | AccessOp::Delete | AccessOp::Create { parent_id: Some(_) } => {
            grants.is_author(grant_id)
        }
        // Sharing someone else's root requires ownership or admin.
        AccessOp::Share | AccessOp::Chown | AccessOp::Create { parent_id: None } => false,
    };

    if granted {
        Decision::Allow(DecisionSource::Grant)
    } else {
        Decision::Deny("the root folder does not grant this access")
    }
}
