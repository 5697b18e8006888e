//! The acting user, threaded explicitly through every engine call.

use async_trait::async_trait;
use dashmap::DashMap;

use foldershare_core::result::AppResult;
use foldershare_core::traits::identity::UserDirectory;
use foldershare_core::types::{RolePermissions, UserId};

/// The acting user for one logical operation.
///
/// There is no ambient "current user": every access check and engine call
/// receives the actor as an explicit parameter. `user_id == None` is an
/// anonymous visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The authenticated user, or `None` for anonymous visitors.
    pub user_id: Option<UserId>,
    /// Role permissions resolved from the identity collaborator.
    pub permissions: RolePermissions,
}

impl Actor {
    /// An authenticated actor with the given permissions.
    pub fn new(user_id: UserId, permissions: RolePermissions) -> Self {
        Self {
            user_id: Some(user_id),
            permissions,
        }
    }

    /// An anonymous actor with the given permissions.
    pub fn anonymous(permissions: RolePermissions) -> Self {
        Self {
            user_id: None,
            permissions,
        }
    }

    /// An authenticated site administrator.
    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, RolePermissions::admin())
    }

    /// Whether this actor is an anonymous visitor.
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    /// Whether this actor holds the admin role permission.
    pub fn is_admin(&self) -> bool {
        self.permissions.is_admin
    }

    /// Whether this actor is the given authenticated user.
    pub fn is_user(&self, user_id: UserId) -> bool {
        self.user_id == Some(user_id)
    }

    /// The user id to match against grant sets.
    ///
    /// Anonymous visitors resolve against [`UserId::ANONYMOUS`], so a root
    /// folder can be shared with everyone by granting that id.
    pub fn grant_id(&self) -> UserId {
        self.user_id.unwrap_or(UserId::ANONYMOUS)
    }
}

/// In-memory user directory used by tests and the default wiring.
#[derive(Debug, Default)]
pub struct StaticUserDirectory {
    users: DashMap<UserId, RolePermissions>,
    anonymous: RolePermissions,
}

impl StaticUserDirectory {
    /// A directory where anonymous visitors hold the given permissions.
    pub fn new(anonymous: RolePermissions) -> Self {
        Self {
            users: DashMap::new(),
            anonymous,
        }
    }

    /// Register a user with the given permissions.
    pub fn insert(&self, user_id: UserId, permissions: RolePermissions) {
        self.users.insert(user_id, permissions);
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn permissions_for(&self, user_id: Option<UserId>) -> AppResult<RolePermissions> {
        Ok(match user_id {
            Some(uid) => self
                .users
                .get(&uid)
                .map(|p| *p)
                .unwrap_or(self.anonymous),
            None => self.anonymous,
        })
    }

    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.users.contains_key(&user_id))
    }
}
