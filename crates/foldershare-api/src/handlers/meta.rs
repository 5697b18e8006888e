//! Health, version, and configuration handlers.

use axum::Json;
use axum::extract::State;

use foldershare_core::error::AppError;

use crate::dto::response::ok_json;
use crate::state::ApiState;

/// GET /foldershare/health
pub async fn health(
    State(state): State<ApiState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let storage_ok = state.engine.storage().health_check().await.unwrap_or(false);
    Ok(Json(ok_json(serde_json::json!({
        "status": if storage_ok { "ok" } else { "degraded" },
        "storage": storage_ok,
        "backend": state.config.database.backend,
    }))))
}

/// GET /foldershare/version
pub async fn version() -> Json<serde_json::Value> {
    Json(ok_json(serde_json::json!({
        "name": "foldershare",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// GET /foldershare/configuration
///
/// The policy subset clients need; connection details stay private.
pub async fn configuration(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(ok_json(serde_json::json!({
        "sharing": state.config.sharing,
        "max_upload_size_bytes": state.config.storage.max_upload_size_bytes,
        "max_zip_members": state.config.storage.max_zip_members,
        "max_zip_extracted_bytes": state.config.storage.max_zip_extracted_bytes,
    })))
}
