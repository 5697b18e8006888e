//! ZIP archive handlers.

use axum::Json;
use axum::extract::{Path, State};

use foldershare_access::AccessOp;
use foldershare_core::error::AppError;
use foldershare_core::types::ItemId;

use crate::dto::request::ArchiveRequest;
use crate::dto::response::bulk_json;
use crate::extractors::RequestActor;
use crate::handlers::{authorize, load_item, require_user};
use crate::state::ApiState;

/// POST /foldershare/entities/{id}/archive
///
/// Packs the named direct children of the addressed folder into a new
/// ZIP file entity created in the same folder.
pub async fn archive_to_zip(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<ArchiveRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_user(&actor)?;
    let parent = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Create { parent_id: Some(id) }, &parent).await?;

    let report = state.engine.archive_to_zip(user, id, &req.child_ids).await?;
    Ok(Json(bulk_json(&report)))
}

/// POST /foldershare/entities/{id}/unarchive
///
/// Extracts a ZIP file entity into its containing folder.
pub async fn unarchive_from_zip(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_user(&actor)?;
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::View, &item).await?;

    let parent_id = item
        .parent_id
        .ok_or_else(|| AppError::validation("The entity is not inside a folder"))?;
    let parent = load_item(&state, parent_id).await?;
    authorize(
        &state,
        &actor,
        AccessOp::Create {
            parent_id: Some(parent_id),
        },
        &parent,
    )
    .await?;

    let report = state.engine.unarchive_from_zip(user, id).await?;
    Ok(Json(bulk_json(&report)))
}
