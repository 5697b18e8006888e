//! Request body and query DTOs.

use std::collections::BTreeSet;

use serde::Deserialize;

use foldershare_core::types::{ItemId, UserId};
use foldershare_entity::grants::GrantLevel;

/// Body for `POST /foldershare/roots`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRootRequest {
    /// Desired root-folder name.
    pub name: String,
    /// Auto-disambiguate the name on collision.
    #[serde(default)]
    pub allow_rename: bool,
}

/// Body for `POST /foldershare/entities/{id}/folders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFolderRequest {
    /// Desired folder name.
    pub name: String,
    /// Auto-disambiguate the name on collision.
    #[serde(default)]
    pub allow_rename: bool,
}

/// Body for `PATCH /foldershare/entities/{id}/name`.
#[derive(Debug, Clone, Deserialize)]
pub struct RenameRequest {
    /// The new name.
    pub name: String,
}

/// Body for `PATCH /foldershare/entities/{id}/description`.
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionRequest {
    /// The new description.
    pub description: String,
}

/// Body for `PATCH /foldershare/entities/{id}/field`.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRequest {
    /// Key in the extensible field bag.
    pub key: String,
    /// New value; `null` or absent clears the key.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Body for `POST /foldershare/entities/{id}/move`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    /// Destination folder; absent means promote to a root folder.
    #[serde(default)]
    pub dest_parent_id: Option<ItemId>,
    /// Optional new name at the destination.
    #[serde(default)]
    pub new_name: Option<String>,
}

/// Body for `POST /foldershare/entities/{id}/copy`.
#[derive(Debug, Clone, Deserialize)]
pub struct CopyRequest {
    /// Destination folder; absent means copy as a new root folder.
    #[serde(default)]
    pub dest_parent_id: Option<ItemId>,
    /// Auto-disambiguate the top-level name on collision.
    #[serde(default)]
    pub adjust_name: bool,
    /// Optional new name for the copy.
    #[serde(default)]
    pub new_name: Option<String>,
}

/// Body for `POST /foldershare/entities/{id}/chown`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChownRequest {
    /// The new owner.
    pub new_owner: UserId,
    /// Also change the owner of every descendant.
    #[serde(default)]
    pub recursive: bool,
}

/// Body for `POST`/`DELETE /foldershare/entities/{id}/grants`.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantRequest {
    /// The granted user.
    pub user_id: UserId,
    /// The grant level.
    pub level: GrantLevel,
}

/// Body for `PUT /foldershare/entities/{id}/grants`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetGrantsRequest {
    /// Users who may view.
    #[serde(default)]
    pub view: BTreeSet<UserId>,
    /// Users who may view and modify.
    #[serde(default)]
    pub author: BTreeSet<UserId>,
    /// Users whose access is suspended.
    #[serde(default)]
    pub disabled: BTreeSet<UserId>,
}

/// Body for `POST /foldershare/entities/{id}/archive`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveRequest {
    /// Direct children of the addressed folder to pack.
    pub child_ids: Vec<ItemId>,
}

/// Query for `DELETE /foldershare/entities/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteQuery {
    /// Delete non-empty folders together with their subtree.
    #[serde(default)]
    pub recursive: bool,
}

/// Query for `GET /foldershare/domains/{scheme}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainQuery {
    /// Address another user's domain (`private://uid/` form).
    #[serde(default)]
    pub uid: Option<i64>,
}

/// Query for `GET /foldershare/resolve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveQuery {
    /// Scheme path to resolve, e.g. `private:/home/docs`.
    pub path: String,
}

/// Query for uploads and other creations.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowRenameQuery {
    /// Auto-disambiguate names on collision.
    #[serde(default)]
    pub allow_rename: bool,
}
