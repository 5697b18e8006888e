//! Shared domain types: typed identifiers and role permissions.

pub mod id;
pub mod permissions;

pub use id::{FileId, ItemId, UserId};
pub use permissions::RolePermissions;
