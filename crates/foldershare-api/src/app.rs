//! Application builder: wires config, store, storage, and engine into a
//! running Axum server.

use std::sync::Arc;

use axum::Router;

use foldershare_core::config::AppConfig;
use foldershare_core::error::AppError;
use foldershare_core::traits::identity::UserDirectory;
use foldershare_database::{connection, migration, MemoryEntityStore, PgEntityStore};
use foldershare_engine::TreeEngine;
use foldershare_entity::store::EntityStore;
use foldershare_storage::{LocalFileStorage, StoragePathMapper};

use crate::observer::TracingObserver;
use crate::router::build_router;
use crate::state::ApiState;

/// Builds the complete Axum application from a ready state.
pub fn build_app(state: ApiState) -> Router {
    build_router(state)
}

/// Build the engine and handler state from configuration.
///
/// Selects the entity store backend per `database.backend`, opens the
/// local file storage, and registers the tracing observer.
pub async fn build_state(
    config: AppConfig,
    users: Arc<dyn UserDirectory>,
) -> Result<ApiState, AppError> {
    let store: Arc<dyn EntityStore> = match config.database.backend.as_str() {
        "memory" => Arc::new(MemoryEntityStore::new()),
        "postgres" => {
            let pool = connection::create_pool(&config.database).await?;
            migration::run_migrations(&pool).await?;
            Arc::new(PgEntityStore::new(pool))
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown database backend '{other}'"
            )));
        }
    };

    let storage = Arc::new(LocalFileStorage::new(&config.storage.root_path).await?);
    let mapper = StoragePathMapper::new(&config.storage)?;

    let mut engine = TreeEngine::new(
        store,
        storage,
        mapper,
        config.sharing.clone(),
        config.storage.clone(),
    );
    engine.register_observer(Arc::new(TracingObserver));

    Ok(ApiState::new(Arc::new(config), Arc::new(engine), users))
}

/// Runs the FolderShare server until shutdown.
pub async fn run_server(
    config: AppConfig,
    users: Arc<dyn UserDirectory>,
) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config, users).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("FolderShare server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
}
