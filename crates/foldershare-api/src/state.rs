//! Application state shared across all handlers.

use std::sync::Arc;

use foldershare_core::config::AppConfig;
use foldershare_core::traits::identity::UserDirectory;
use foldershare_engine::TreeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<ApiState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The entity tree engine.
    pub engine: Arc<TreeEngine>,
    /// The user/identity collaborator.
    pub users: Arc<dyn UserDirectory>,
}

impl ApiState {
    /// Bundle the collaborators into a handler state.
    pub fn new(config: Arc<AppConfig>, engine: Arc<TreeEngine>, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            config,
            engine,
            users,
        }
    }
}
