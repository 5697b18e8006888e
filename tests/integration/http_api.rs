//! Router-level tests: status mapping, envelopes, and the download path.

use axum::http::StatusCode;
use bytes::Bytes;
use serde_json::json;

use crate::helpers::{TestApp, ADMIN, ALICE, BOB};

#[tokio::test]
async fn test_health_and_version() {
    let app = TestApp::new().await;

    let health = app.request("GET", "/foldershare/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["status"], "ok");

    let version = app.request("GET", "/foldershare/version", None, None).await;
    assert_eq!(version.status, StatusCode::OK);
    assert_eq!(version.body["data"]["name"], "foldershare");
}

#[tokio::test]
async fn test_create_root_and_read_it_back() {
    let app = TestApp::new().await;

    let created = app
        .request(
            "POST",
            "/foldershare/roots",
            Some(ALICE),
            Some(json!({ "name": "home" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["data"]["name"], "home");
    let id = created.body["data"]["id"].as_i64().unwrap();

    let fetched = app
        .request("GET", &format!("/foldershare/entities/{id}"), Some(ALICE), None)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["kind"], "root_folder");
}

#[tokio::test]
async fn test_missing_entity_is_404() {
    let app = TestApp::new().await;
    let response = app
        .request("GET", "/foldershare/entities/424242", Some(ALICE), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_non_empty_folder_is_400() {
    let app = TestApp::new().await;
    let root = app.engine.create_root_folder(ALICE, "home", false).await.unwrap();
    app.engine
        .create_folder(ALICE, root.id, "docs", false)
        .await
        .unwrap();

    let response = app
        .request(
            "DELETE",
            &format!("/foldershare/entities/{}", root.id),
            Some(ALICE),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "DELETE",
            &format!("/foldershare/entities/{}?recursive=true", root.id),
            Some(ALICE),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
}

#[tokio::test]
async fn test_other_users_content_is_403_until_granted() {
    let app = TestApp::new().await;
    let root = app.engine.create_root_folder(ALICE, "shared", false).await.unwrap();
    let uri = format!("/foldershare/entities/{}", root.id);

    let denied = app.request("GET", &uri, Some(BOB), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let granted = app
        .request(
            "POST",
            &format!("{uri}/grants"),
            Some(ALICE),
            Some(json!({ "user_id": BOB.0, "level": "view" })),
        )
        .await;
    assert_eq!(granted.status, StatusCode::OK);

    let viewed = app.request("GET", &uri, Some(BOB), None).await;
    assert_eq!(viewed.status, StatusCode::OK);

    // A view grant does not allow edits.
    let renamed = app
        .request(
            "PATCH",
            &format!("{uri}/name"),
            Some(BOB),
            Some(json!({ "name": "mine-now" })),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_anonymous_is_gated_by_policy() {
    let app = TestApp::new().await;
    let root = app.engine.create_root_folder(ALICE, "public", false).await.unwrap();

    // Without an anonymous grant (and with anonymous sharing disabled by
    // default) there is no access at all.
    let response = app
        .request("GET", &format!("/foldershare/entities/{}", root.id), None, None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_locked_entity_maps_to_423() {
    let app = TestApp::new().await;
    let root = app.engine.create_root_folder(ALICE, "home", false).await.unwrap();
    let _guard = app.engine.locks().try_lock(root.id).unwrap();

    let response = app
        .request(
            "PATCH",
            &format!("/foldershare/entities/{}/name", root.id),
            Some(ALICE),
            Some(json!({ "name": "renamed" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::LOCKED);
}

#[tokio::test]
async fn test_download_streams_bytes_with_headers() {
    let app = TestApp::new().await;
    let root = app.engine.create_root_folder(ALICE, "home", false).await.unwrap();
    let file = app
        .engine
        .add_file(ALICE, root.id, "notes.txt", Bytes::from("hello world"), false)
        .await
        .unwrap();

    let (status, bytes, headers) = app
        .request_bytes(&format!("/foldershare/download/{}", file.id), Some(ALICE))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"hello world");
    assert_eq!(headers["content-type"], "text/plain");
    assert!(headers["content-disposition"]
        .to_str()
        .unwrap()
        .contains("notes.txt"));
}

#[tokio::test]
async fn test_usage_endpoint_is_self_or_admin() {
    let app = TestApp::new().await;
    app.engine.create_root_folder(ALICE, "home", false).await.unwrap();

    let own = app
        .request("GET", &format!("/foldershare/usage/{}", ALICE.0), Some(ALICE), None)
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["data"]["n_root_folders"], 1);

    let peeking = app
        .request("GET", &format!("/foldershare/usage/{}", ALICE.0), Some(BOB), None)
        .await;
    assert_eq!(peeking.status, StatusCode::FORBIDDEN);

    let admin = app
        .request("GET", &format!("/foldershare/usage/{}", ALICE.0), Some(ADMIN), None)
        .await;
    assert_eq!(admin.status, StatusCode::OK);
}

#[tokio::test]
async fn test_copy_endpoint_reports_bulk_outcome() {
    let app = TestApp::new().await;
    let root = app.engine.create_root_folder(ALICE, "home", false).await.unwrap();
    let docs = app
        .engine
        .create_folder(ALICE, root.id, "docs", false)
        .await
        .unwrap();
    app.engine
        .add_file(ALICE, docs.id, "a.txt", Bytes::from("a"), false)
        .await
        .unwrap();

    let response = app
        .request(
            "POST",
            &format!("/foldershare/entities/{}/copy", docs.id),
            Some(ALICE),
            Some(json!({ "dest_parent_id": root.id.0, "adjust_name": true })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["failures"], json!([]));
    assert_eq!(response.body["data"]["name"], "docs (1)");
}
