//! Entity read handlers: get, children, ancestors, descendants, resolve.

use axum::Json;
use axum::extract::{Path, Query, State};

use foldershare_access::fields::viewable_json;
use foldershare_access::AccessOp;
use foldershare_core::error::AppError;
use foldershare_core::types::ItemId;
use foldershare_engine::ResolvedPath;

use crate::dto::request::ResolveQuery;
use crate::dto::response::ok_json;
use crate::extractors::RequestActor;
use crate::handlers::{authorize, load_item};
use crate::state::ApiState;

/// GET /foldershare/entities/{id}
pub async fn get_entity(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::View, &item).await?;
    Ok(Json(ok_json(viewable_json(&item, &actor)?)))
}

/// GET /foldershare/entities/{id}/children
pub async fn list_children(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::View, &item).await?;

    let children = state.engine.store().list_children(id).await?;
    let mut visible = Vec::with_capacity(children.len());
    for child in &children {
        if authorize(&state, &actor, AccessOp::View, child).await.is_ok() {
            visible.push(viewable_json(child, &actor)?);
        }
    }
    Ok(Json(ok_json(visible)))
}

/// GET /foldershare/entities/{id}/ancestors
pub async fn list_ancestors(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::View, &item).await?;
    let ids = state.engine.ancestor_ids(id).await?;
    Ok(Json(ok_json(ids)))
}

/// GET /foldershare/entities/{id}/descendants
pub async fn list_descendants(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = load_item(&state, id).await?;
    authorize(&state, &actor, AccessOp::View, &item).await?;
    let ids = state.engine.descendant_ids(id).await?;
    Ok(Json(ok_json(ids)))
}

/// GET /foldershare/resolve?path=private:/home/docs
pub async fn resolve(
    State(state): State<ApiState>,
    actor: RequestActor,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    match state.engine.resolve_path(&actor, &query.path).await? {
        ResolvedPath::Item(item) => {
            authorize(&state, &actor, AccessOp::View, &item).await?;
            Ok(Json(ok_json(viewable_json(&item, &actor)?)))
        }
        ResolvedPath::DomainRoot { scheme, uid } => {
            let roots = state.engine.roots_in_domain(&actor, scheme, uid).await?;
            let mut visible = Vec::with_capacity(roots.len());
            for root in &roots {
                if authorize(&state, &actor, AccessOp::View, root).await.is_ok() {
                    visible.push(viewable_json(root, &actor)?);
                }
            }
            Ok(Json(ok_json(visible)))
        }
    }
}
