//! # foldershare-entity
//!
//! Entity model for FolderShare: the tree item record and its kinds, name
//! validation and disambiguation, per-root access grants, scheme paths,
//! per-user usage counters, the field-level access policy tables, and the
//! persistence seam ([`store::EntityStore`]).

pub mod fields;
pub mod grants;
pub mod item;
pub mod name;
pub mod path;
pub mod store;
pub mod usage;

pub use grants::{AccessGrants, GrantLevel};
pub use item::{CreateItem, Item, ItemKind};
pub use path::{PathScheme, SchemePath};
pub use store::EntityStore;
pub use usage::{UsageDelta, UserUsage};
