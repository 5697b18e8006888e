//! User/identity collaborator trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{RolePermissions, UserId};

/// Trait for the user/identity collaborator.
///
/// The core treats this as an opaque boolean-permission oracle: given a
/// user id (or `None` for an anonymous visitor), it reports the role
/// permissions that user holds. How users and roles are administered is
/// outside the core.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve the role permissions for a user; `None` means anonymous.
    async fn permissions_for(&self, user_id: Option<UserId>) -> AppResult<RolePermissions>;

    /// Whether the given user id refers to a known user.
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool>;
}
