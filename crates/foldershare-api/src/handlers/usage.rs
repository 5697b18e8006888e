//! Usage-accounting handlers.

use axum::Json;
use axum::extract::{Path, State};

use foldershare_core::error::AppError;
use foldershare_core::types::UserId;

use crate::dto::response::ok_json;
use crate::extractors::RequestActor;
use crate::state::ApiState;

/// GET /foldershare/usage/{uid}
///
/// Users may read their own counters; administrators may read anyone's.
pub async fn get_usage(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(uid): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = UserId(uid);
    if !actor.is_admin() && !actor.is_user(uid) {
        return Err(AppError::forbidden("Usage is visible to the user and administrators"));
    }
    let usage = state.engine.usage_for(uid).await?;
    Ok(Json(ok_json(usage)))
}

/// POST /foldershare/usage/update
///
/// Full recompute of every user's counters; administrators only.
pub async fn update_usage(
    State(state): State<ApiState>,
    actor: RequestActor,
) -> Result<Json<serde_json::Value>, AppError> {
    if !actor.is_admin() {
        return Err(AppError::forbidden("Usage recompute is an administrative operation"));
    }
    let usage = state.engine.update_usage_all_users().await?;
    Ok(Json(ok_json(usage)))
}
