//! Access-checked streaming download handler.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;

use foldershare_access::AccessOp;
use foldershare_core::error::AppError;
use foldershare_core::types::ItemId;
use foldershare_storage::local::mime_from_name;

use crate::extractors::RequestActor;
use crate::handlers::{authorize, load_item};
use crate::state::ApiState;

/// GET /foldershare/download/{id}
///
/// Streams the stored bytes of a file entity. The entity id, not the
/// storage path, is the public identifier; the storage path mapper is
/// an internal detail.
pub async fn download(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Response, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::View, &item).await?;

    if !item.is_file() {
        return Err(AppError::validation(format!(
            "Entity '{}' is not a file",
            item.name
        )));
    }
    let file_id = item
        .file_id
        .ok_or_else(|| AppError::not_found("The entity has no stored content"))?;

    let object_path = state.engine.mapper().object_path(file_id)?;
    let stream = state.engine.storage().read(&object_path).await?;

    let content_type =
        mime_from_name(&item.name).unwrap_or_else(|| "application/octet-stream".to_string());

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", item.name),
        );
    if let Some(size) = item.size {
        builder = builder.header(header::CONTENT_LENGTH, size);
    }

    builder
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}
