//! HTTP handlers, organized by concern.

pub mod archive;
pub mod domains;
pub mod download;
pub mod entity;
pub mod grants;
pub mod meta;
pub mod tree;
pub mod usage;

use foldershare_access::{decide, AccessOp, Actor};
use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{ItemId, UserId};
use foldershare_entity::item::Item;

use crate::state::ApiState;

/// Fetch an entity or fail with `NotFound`.
pub(crate) async fn load_item(state: &ApiState, id: ItemId) -> AppResult<Item> {
    state
        .engine
        .store()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Entity {id} not found")))
}

/// Run the access evaluator for an operation on a loaded entity.
///
/// Loads the entity's root folder when the entity is not itself a root,
/// so grant evaluation sees the grant record that governs the subtree.
pub(crate) async fn authorize(
    state: &ApiState,
    actor: &Actor,
    op: AccessOp,
    item: &Item,
) -> AppResult<()> {
    let root = if item.is_root() {
        None
    } else {
        state.engine.store().find_by_id(item.root_id).await?
    };
    decide(actor, op, Some(item), root.as_ref(), state.engine.sharing()).require()
}

/// Run the access evaluator for an operation with no target entity
/// (creating a new root folder).
pub(crate) fn authorize_rootless(state: &ApiState, actor: &Actor, op: AccessOp) -> AppResult<()> {
    decide(actor, op, None, None, state.engine.sharing()).require()
}

/// The authenticated user id, or `Forbidden` for anonymous visitors.
///
/// Mutations need an owner for the entities they create; anonymous
/// visitors can at most view what is publicly granted.
pub(crate) fn require_user(actor: &Actor) -> AppResult<UserId> {
    actor
        .user_id
        .ok_or_else(|| AppError::forbidden("This operation requires an authenticated user"))
}
