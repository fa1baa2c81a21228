mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::{MockPublisher, MockStore, api_error, article};
use http_body_util::BodyExt;
use kickoff::{AppState, router};
use kickoff_core::WorkflowConfig;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

fn ready_state(store: MockStore, publisher: MockPublisher) -> AppState {
    AppState::new(
        Some(Arc::new(store)),
        Some(Arc::new(publisher)),
        WorkflowConfig::default(),
    )
}

fn empty_store() -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_find_by_status()
        .returning(|_, _, _| Ok(vec![]));
    store
}

async fn send(app: Router, method: Method, headers: &[(&str, &str)]) -> axum::response::Response {
    let mut request = Request::builder().method(method).uri("/");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn allow_origin(response: &axum::response::Response) -> Option<&str> {
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok())
}

// ── Preflight ──

#[tokio::test]
async fn options_returns_cors_preflight() {
    let app = router(AppState::new(None, None, WorkflowConfig::default()));

    let response = send(app, Method::OPTIONS, &[]).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn preflight_is_not_gated_by_server_key() {
    let state = AppState::new(None, None, WorkflowConfig::default())
        .with_server_key(Some(SecretString::from("k".to_owned())));

    let response = send(router(state), Method::OPTIONS, &[]).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization, X-Server-Key"
    );
}

// ── Trigger ──

#[tokio::test]
async fn post_queues_articles_and_reports_counts() {
    let mut store = MockStore::new();
    store
        .expect_find_by_status()
        .returning(|_, _, _| Ok(vec![article("a1"), article("a2")]));
    store.expect_set_status().times(2).returning(|_, _, _| Ok(()));
    let mut publisher = MockPublisher::new();
    publisher
        .expect_publish()
        .times(2)
        .returning(|_| Ok("m".to_owned()));

    let response = send(router(ready_state(store, publisher)), Method::POST, &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(allow_origin(&response), Some("*"));
    assert_eq!(
        json_body(response).await,
        json!({
            "status": "success",
            "message": "Workflow started. Queued 2 articles for processing.",
            "processed": 2,
            "errors": 0
        })
    );
}

#[tokio::test]
async fn post_with_nothing_pending_succeeds() {
    let response = send(
        router(ready_state(empty_store(), MockPublisher::new())),
        Method::POST,
        &[],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["processed"], 0);
    assert_eq!(body["errors"], 0);
}

#[tokio::test]
async fn post_reports_partial_failures_as_success() {
    let mut store = MockStore::new();
    store
        .expect_find_by_status()
        .returning(|_, _, _| Ok(vec![article("a1"), article("a2")]));
    store.expect_set_status().returning(|_, _, _| Ok(()));
    let mut publisher = MockPublisher::new();
    publisher.expect_publish().returning(|data| {
        if data == b"a2" {
            Err(api_error(503))
        } else {
            Ok("m".to_owned())
        }
    });

    let response = send(router(ready_state(store, publisher)), Method::POST, &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["processed"], 1);
    assert_eq!(body["errors"], 1);
    assert_eq!(
        body["message"],
        "Workflow started. Queued 1 articles for processing. Failed to queue 1 articles."
    );
}

// ── Error cases ──

#[tokio::test]
async fn post_without_backends_is_configuration_error() {
    let app = router(AppState::new(
        Some(Arc::new(empty_store())),
        None,
        WorkflowConfig::default(),
    ));

    let response = send(app, Method::POST, &[]).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(allow_origin(&response), Some("*"));
    assert_eq!(
        json_body(response).await,
        json!({"status": "error", "message": "Server configuration error."})
    );
}

#[tokio::test]
async fn post_with_failing_query_is_internal_error() {
    let mut store = MockStore::new();
    store
        .expect_find_by_status()
        .returning(|_, _, _| Err(api_error(500)));

    let response = send(
        router(ready_state(store, MockPublisher::new())),
        Method::POST,
        &[],
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(allow_origin(&response), Some("*"));
    assert_eq!(
        json_body(response).await,
        json!({"status": "error", "message": "An internal error occurred."})
    );
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let app = router(AppState::new(None, None, WorkflowConfig::default()));

    let response = send(app, Method::GET, &[]).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── Server key ──

fn keyed_state() -> AppState {
    ready_state(empty_store(), MockPublisher::new())
        .with_server_key(Some(SecretString::from("s3cret".to_owned())))
}

#[tokio::test]
async fn server_key_required_when_configured() {
    let response = send(router(keyed_state()), Method::POST, &[]).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["status"], "error");
}

#[tokio::test]
async fn wrong_server_key_is_rejected() {
    let response = send(
        router(keyed_state()),
        Method::POST,
        &[("x-server-key", "guess")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn matching_server_key_passes_through() {
    let response = send(
        router(keyed_state()),
        Method::POST,
        &[("x-server-key", "s3cret")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}
