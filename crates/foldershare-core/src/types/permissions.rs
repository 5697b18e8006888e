//! Role permissions resolved from the user/identity collaborator.

use serde::{Deserialize, Serialize};

/// Boolean role permissions for a user, as reported by the identity oracle.
///
/// FolderShare treats the identity collaborator as an opaque source of
/// these flags; how roles are assigned is outside the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissions {
    /// May view entities (subject to ownership/grant checks).
    pub can_view: bool,
    /// May create, update, and delete entities they have access to.
    pub can_author: bool,
    /// May share root folders and create new root folders.
    pub can_share: bool,
    /// Site administrator: bypasses ownership and grant checks.
    pub is_admin: bool,
}

impl RolePermissions {
    /// Full permissions, as held by a site administrator.
    pub fn admin() -> Self {
        Self {
            can_view: true,
            can_author: true,
            can_share: true,
            is_admin: true,
        }
    }

    /// Typical authenticated-user permissions.
    pub fn member() -> Self {
        Self {
            can_view: true,
            can_author: true,
            can_share: true,
            is_admin: false,
        }
    }

    /// View-only permissions.
    pub fn viewer() -> Self {
        Self {
            can_view: true,
            can_author: false,
            can_share: false,
            is_admin: false,
        }
    }
}
