//! Tree mutation handlers: create, upload, rename, move, copy, delete,
//! owner change, and size maintenance.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use bytes::Bytes;

use foldershare_access::fields::require_editable;
use foldershare_access::AccessOp;
use foldershare_core::error::AppError;
use foldershare_core::types::ItemId;

use crate::dto::request::{
    AllowRenameQuery, ChownRequest, CopyRequest, CreateFolderRequest, CreateRootRequest,
    DeleteQuery, DescriptionRequest, FieldRequest, MoveRequest, RenameRequest,
};
use crate::dto::response::{bulk_json, ok_json};
use crate::extractors::RequestActor;
use crate::handlers::{authorize, authorize_rootless, load_item, require_user};
use crate::state::ApiState;

/// POST /foldershare/roots
pub async fn create_root(
    State(state): State<ApiState>,
    actor: RequestActor,
    Json(req): Json<CreateRootRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_user(&actor)?;
    authorize_rootless(&state, &actor, AccessOp::Create { parent_id: None })?;
    let root = state
        .engine
        .create_root_folder(user, &req.name, req.allow_rename)
        .await?;
    Ok(Json(ok_json(root)))
}

/// POST /foldershare/entities/{id}/folders
pub async fn create_folder(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_user(&actor)?;
    let parent = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Create { parent_id: Some(id) }, &parent).await?;
    let folder = state
        .engine
        .create_folder(user, id, &req.name, req.allow_rename)
        .await?;
    Ok(Json(ok_json(folder)))
}

/// POST /foldershare/entities/{id}/files (multipart upload)
///
/// Every multipart field that carries a file name becomes one new file
/// entity; failures are reported per file and the rest go through.
pub async fn upload_files(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Query(query): Query<AllowRenameQuery>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_user(&actor)?;
    let parent = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Create { parent_id: Some(id) }, &parent).await?;

    let mut files: Vec<(String, Bytes)> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let Some(file_name) = field.file_name().map(String::from) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Multipart read error: {e}")))?;
        files.push((file_name, data));
    }
    if files.is_empty() {
        return Err(AppError::validation("No file parts in the upload"));
    }

    let report = state
        .engine
        .add_files(user, id, files, query.allow_rename)
        .await?;
    Ok(Json(bulk_json(&report)))
}

/// PATCH /foldershare/entities/{id}/name
pub async fn rename(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Update, &item).await?;
    let item = state.engine.rename(id, &req.name).await?;
    Ok(Json(ok_json(item)))
}

/// PATCH /foldershare/entities/{id}/description
pub async fn set_description(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<DescriptionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Update, &item).await?;
    let item = state.engine.set_description(id, &req.description).await?;
    Ok(Json(ok_json(item)))
}

/// PATCH /foldershare/entities/{id}/field
pub async fn set_field(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<FieldRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_editable(&req.key)?;
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Update, &item).await?;
    let item = state.engine.set_field(id, &req.key, req.value).await?;
    Ok(Json(ok_json(item)))
}

/// POST /foldershare/entities/{id}/move
pub async fn move_entity(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Update, &item).await?;

    let moved = match req.dest_parent_id {
        Some(dest_id) => {
            let dest = load_item(&state, dest_id).await?;
            authorize(
                &state,
                &actor,
                AccessOp::Create {
                    parent_id: Some(dest_id),
                },
                &dest,
            )
            .await?;
            state
                .engine
                .move_to_folder(id, dest_id, req.new_name.as_deref())
                .await?
        }
        None => {
            authorize_rootless(&state, &actor, AccessOp::Create { parent_id: None })?;
            state.engine.move_to_root(id, req.new_name.as_deref()).await?
        }
    };
    Ok(Json(ok_json(moved)))
}

/// POST /foldershare/entities/{id}/copy
pub async fn copy_entity(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<CopyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_user(&actor)?;
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::View, &item).await?;

    let report = match req.dest_parent_id {
        Some(dest_id) => {
            let dest = load_item(&state, dest_id).await?;
            authorize(
                &state,
                &actor,
                AccessOp::Create {
                    parent_id: Some(dest_id),
                },
                &dest,
            )
            .await?;
            state
                .engine
                .copy_to_folder(user, id, dest_id, req.adjust_name, req.new_name.as_deref())
                .await?
        }
        None => {
            authorize_rootless(&state, &actor, AccessOp::Create { parent_id: None })?;
            state
                .engine
                .copy_to_root(user, id, req.adjust_name, req.new_name.as_deref())
                .await?
        }
    };
    Ok(Json(bulk_json(&report)))
}

/// POST /foldershare/entities/{id}/duplicate
pub async fn duplicate(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = require_user(&actor)?;
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::View, &item).await?;
    match item.parent_id {
        Some(parent_id) => {
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
        }
        None => authorize_rootless(&state, &actor, AccessOp::Create { parent_id: None })?,
    }
    let report = state.engine.duplicate(user, id).await?;
    Ok(Json(bulk_json(&report)))
}

/// DELETE /foldershare/entities/{id}?recursive=true
pub async fn delete_entity(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Delete, &item).await?;
    let report = state.engine.delete(id, query.recursive).await?;
    Ok(Json(bulk_json(&report)))
}

/// POST /foldershare/entities/{id}/chown
pub async fn change_owner(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
    Json(req): Json<ChownRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Chown, &item).await?;
    if !state.users.user_exists(req.new_owner).await? {
        return Err(AppError::validation(format!(
            "User {} does not exist",
            req.new_owner
        )));
    }

    if req.recursive {
        let report = state.engine.change_owner_recursive(id, req.new_owner).await?;
        Ok(Json(bulk_json(&report)))
    } else {
        let item = state.engine.change_owner(id, req.new_owner).await?;
        Ok(Json(ok_json(item)))
    }
}

/// POST /foldershare/entities/{id}/size, recomputes folder sizes.
pub async fn update_sizes(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Update, &item).await?;
    let size = state.engine.update_sizes(id).await?;
    Ok(Json(ok_json(serde_json::json!({ "size": size }))))
}

/// DELETE /foldershare/entities/{id}/size, marks the size not-yet-computed.
pub async fn clear_size(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::Update, &item).await?;
    let item = state.engine.clear_size(id).await?;
    Ok(Json(ok_json(item)))
}
