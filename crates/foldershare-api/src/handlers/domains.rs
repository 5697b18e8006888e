//! Sharing-domain listing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use foldershare_access::fields::viewable_json;
use foldershare_access::AccessOp;
use foldershare_core::error::AppError;
use foldershare_core::types::UserId;
use foldershare_entity::path::PathScheme;

use crate::dto::request::DomainQuery;
use crate::dto::response::ok_json;
use crate::extractors::RequestActor;
use crate::handlers::authorize;
use crate::state::ApiState;

/// GET /foldershare/domains/{scheme}?uid=...
///
/// Lists the root folders visible to the actor in the `private`,
/// `shared`, or `public` domain.
pub async fn list_domain_roots(
    State(state): State<ApiState>,
    actor: RequestActor,
    Path(scheme): Path<String>,
    Query(query): Query<DomainQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let scheme = PathScheme::parse(&scheme)
        .ok_or_else(|| AppError::validation(format!("Unknown sharing domain '{scheme}'")))?;
    let uid = query.uid.map(UserId);

    let roots = state.engine.roots_in_domain(&actor, scheme, uid).await?;
    let mut visible = Vec::with_capacity(roots.len());
    for root in &roots {
        if authorize(&state, &actor, AccessOp::View, root).await.is_ok() {
            visible.push(viewable_json(root, &actor)?);
        }
    }
    Ok(Json(ok_json(visible)))
}
