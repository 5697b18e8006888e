//! FolderShare server.
//!
//! Entry point that loads configuration, initializes logging, and starts
//! the HTTP server over the configured entity store backend.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use foldershare_access::StaticUserDirectory;
use foldershare_core::config::AppConfig;
use foldershare_core::types::{RolePermissions, UserId};

#[tokio::main]
async fn main() {
    let env = std::env::var("FOLDERSHARE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Starting FolderShare v{} ({env})", env!("CARGO_PKG_VERSION"));

    // Development wiring: a static directory with one administrator and
    // view-only anonymous visitors. Deployments provide their own
    // `UserDirectory` implementation.
    let users = StaticUserDirectory::new(RolePermissions::viewer());
    users.insert(UserId(1), RolePermissions::admin());

    if let Err(e) = foldershare_api::run_server(config, Arc::new(users)).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing with the configured level and format.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}
