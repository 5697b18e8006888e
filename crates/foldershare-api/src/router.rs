//! Route definitions for the FolderShare HTTP API.
//!
//! All routes are mounted under `/foldershare`. The router receives
//! `ApiState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::ApiState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: ApiState) -> Router {
    // Multipart framing adds overhead on top of the payload itself.
    let max_body = state.config.storage.max_upload_size_bytes as usize + 1024 * 1024;

    let api_routes = Router::new()
        .merge(entity_routes())
        .merge(mutation_routes())
        .merge(grant_routes())
        .merge(archive_routes())
        .merge(meta_routes());

    Router::new()
        .nest("/foldershare", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Entity reads: get, children, ancestors, descendants, resolve, download, domains
fn entity_routes() -> Router<ApiState> {
    Router::new()
        .route("/entities/{id}", get(handlers::entity::get_entity))
        .route(
            "/entities/{id}/children",
            get(handlers::entity::list_children),
        )
        .route(
            "/entities/{id}/ancestors",
            get(handlers::entity::list_ancestors),
        )
        .route(
            "/entities/{id}/descendants",
            get(handlers::entity::list_descendants),
        )
        .route("/resolve", get(handlers::entity::resolve))
        .route("/download/{id}", get(handlers::download::download))
        .route(
            "/domains/{scheme}",
            get(handlers::domains::list_domain_roots),
        )
}

/// Tree mutations: create, upload, rename, move, copy, delete, chown, size
fn mutation_routes() -> Router<ApiState> {
    Router::new()
        .route("/roots", post(handlers::tree::create_root))
        .route(
            "/entities/{id}/folders",
            post(handlers::tree::create_folder),
        )
        .route("/entities/{id}/files", post(handlers::tree::upload_files))
        .route("/entities/{id}/name", patch(handlers::tree::rename))
        .route(
            "/entities/{id}/description",
            patch(handlers::tree::set_description),
        )
        .route("/entities/{id}/field", patch(handlers::tree::set_field))
        .route("/entities/{id}/move", post(handlers::tree::move_entity))
        .route("/entities/{id}/copy", post(handlers::tree::copy_entity))
        .route(
            "/entities/{id}/duplicate",
            post(handlers::tree::duplicate),
        )
        .route("/entities/{id}", delete(handlers::tree::delete_entity))
        .route("/entities/{id}/chown", post(handlers::tree::change_owner))
        .route("/entities/{id}/size", post(handlers::tree::update_sizes))
        .route("/entities/{id}/size", delete(handlers::tree::clear_size))
}

/// Grant mutations on root folders
fn grant_routes() -> Router<ApiState> {
    Router::new()
        .route("/entities/{id}/grants", post(handlers::grants::add_grant))
        .route(
            "/entities/{id}/grants",
            delete(handlers::grants::delete_grant),
        )
        .route("/entities/{id}/grants", put(handlers::grants::set_grants))
        .route(
            "/entities/{id}/grants/all",
            delete(handlers::grants::clear_grants),
        )
}

/// ZIP pack and unpack
fn archive_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/entities/{id}/archive",
            post(handlers::archive::archive_to_zip),
        )
        .route(
            "/entities/{id}/unarchive",
            post(handlers::archive::unarchive_from_zip),
        )
}

/// Health, version, configuration, usage
fn meta_routes() -> Router<ApiState> {
    Router::new()
        .route("/health", get(handlers::meta::health))
        .route("/version", get(handlers::meta::version))
        .route("/configuration", get(handlers::meta::configuration))
        .route("/usage/{uid}", get(handlers::usage::get_usage))
        .route("/usage/update", post(handlers::usage::update_usage))
}
