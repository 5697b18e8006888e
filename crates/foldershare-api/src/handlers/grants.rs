//! Grant mutation handlers on root folders.

use axum::Json;
use axum::extract::{Path, State};

use foldershare_access::AccessOp;
use foldershare_core::error::AppError;
use foldershare_core::types::ItemId;

use crate::dto::request::{GrantRequest, SetGrantsRequest};
use crate::dto::response::ok_json;
use crate::extractors::RequestActor;
use crate::handlers::{authorize, load_item};
use crate::state::ApiState;

/// POST /foldershare/entities/{id}/grants
pub async fn add_grant(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<GrantRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Share, &item).await?;
    let item = state.engine.add_grant(id, req.user_id, req.level).await?;
    Ok(Json(ok_json(item)))
}

/// DELETE /foldershare/entities/{id}/grants
pub async fn delete_grant(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<GrantRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Share, &item).await?;
    let item = state.engine.delete_grant(id, req.user_id, req.level).await?;
    Ok(Json(ok_json(item)))
}

/// PUT /foldershare/entities/{id}/grants
pub async fn set_grants(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<SetGrantsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Share, &item).await?;
    let item = state
        .engine
        .set_grants(id, req.view, req.author, req.disabled)
        .await?;
    Ok(Json(ok_json(item)))
}

/// DELETE /foldershare/entities/{id}/grants/all
pub async fn clear_grants(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Share, &item).await?;
    let item = state.engine.clear_grants(id).await?;
    Ok(Json(ok_json(item)))
}
