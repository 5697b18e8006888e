//! Shared test helpers: an engine over the in-memory store, and a full
//! HTTP application for router-level tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use foldershare_access::StaticUserDirectory;
use foldershare_api::{build_app, ApiState};
use foldershare_core::config::AppConfig;
use foldershare_core::types::{RolePermissions, UserId};
use foldershare_database::MemoryEntityStore;
use foldershare_engine::TreeEngine;
use foldershare_storage::{LocalFileStorage, StoragePathMapper};

/// Seeded administrator.
pub const ADMIN: UserId = UserId(1);
/// Seeded regular user.
pub const ALICE: UserId = UserId(2);
/// Seeded regular user.
pub const BOB: UserId = UserId(3);

/// A default configuration pointed at a per-test storage directory.
pub fn test_config(root: &std::path::Path) -> AppConfig {
    let mut config = AppConfig {
        server: Default::default(),
        database: Default::default(),
        storage: Default::default(),
        sharing: Default::default(),
        logging: Default::default(),
    };
    config.storage.root_path = root.join("files").to_string_lossy().into_owned();
    config
}

/// Build an engine over a fresh in-memory store and temp file storage.
pub async fn engine() -> (Arc<TreeEngine>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let store = Arc::new(MemoryEntityStore::new());
    let storage = Arc::new(
        LocalFileStorage::new(&config.storage.root_path)
            .await
            .expect("storage"),
    );
    let mapper = StoragePathMapper::new(&config.storage).expect("mapper");
    let engine = TreeEngine::new(
        store,
        storage,
        mapper,
        config.sharing.clone(),
        config.storage.clone(),
    );
    (Arc::new(engine), dir)
}

/// Test application context for router-level tests.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// The engine behind the router, for direct setup calls.
    pub engine: Arc<TreeEngine>,
    _dir: tempfile::TempDir,
}

/// One decoded test response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl TestApp {
    /// Build the full application over a fresh in-memory store.
    pub async fn new() -> Self {
        let (engine, dir) = engine().await;
        let config = test_config(dir.path());

        let users = StaticUserDirectory::new(RolePermissions::viewer());
        users.insert(ADMIN, RolePermissions::admin());
        users.insert(ALICE, RolePermissions::member());
        users.insert(BOB, RolePermissions::member());

        let state = ApiState::new(Arc::new(config), Arc::clone(&engine), Arc::new(users));
        Self {
            router: build_app(state),
            engine,
            _dir: dir,
        }
    }

    /// Issue one request; `user` fills the asserted-identity header.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        user: Option<UserId>,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(uid) = user {
            builder = builder.header("x-foldershare-user", uid.0.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        TestResponse { status, body }
    }

    /// Issue a request and fetch the raw bytes (for downloads).
    pub async fn request_bytes(
        &self,
        uri: &str,
        user: Option<UserId>,
    ) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
        let request = {
            let mut builder = Request::builder().method("GET").uri(uri);
            if let Some(uid) = user {
                builder = builder.header("x-foldershare-user", uid.0.to_string());
            }
            builder.body(Body::empty()).expect("request")
        };
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        (status, bytes.to_vec(), headers)
    }
}
