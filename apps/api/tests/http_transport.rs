use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use staffdesk_api::api_client::{ApiError, HttpTransport, Transport, Verb};

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer s3cret")
        && headers.get("ngrok-skip-browser-warning").is_some()
}

async fn list_clients(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "token expired" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "data": [{ "id": "1", "company": "TechCorp Inc" }], "success": true })),
    )
}

async fn create_job(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["title"] == "" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "data": null, "success": false, "message": "title missing" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "data": null, "success": false, "message": "duplicate job" })),
    )
}

async fn stub_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/api/clients", get(list_clients))
        .route("/api/jobs", post(create_job))
        .route("/api/rounds/9", axum::routing::delete(|| async { StatusCode::NO_CONTENT }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn transport(addr: SocketAddr, token: Option<&str>) -> HttpTransport {
    HttpTransport::new(
        format!("http://{addr}/"),
        token.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_bearer_token_and_envelope_unwrap() {
    let addr = stub_upstream().await;
    let data = transport(addr, Some("s3cret"))
        .send(Verb::Get, "/api/clients", None)
        .await
        .unwrap();
    assert_eq!(data, json!([{ "id": "1", "company": "TechCorp Inc" }]));
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let addr = stub_upstream().await;
    let err = transport(addr, Some("stale"))
        .send(Verb::Get, "/api/clients", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    let err = transport(addr, None)
        .send(Verb::Get, "/api/clients", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_error_status_carries_upstream_message() {
    let addr = stub_upstream().await;
    let err = transport(addr, None)
        .send(Verb::Post, "/api/jobs", Some(json!({ "title": "" })))
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "title missing");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_rejected() {
    let addr = stub_upstream().await;
    let err = transport(addr, None)
        .send(Verb::Post, "/api/jobs", Some(json!({ "title": "Dev" })))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected(m) if m == "duplicate job"));
}

#[tokio::test]
async fn test_empty_body_is_null() {
    let addr = stub_upstream().await;
    let data = transport(addr, None)
        .send(Verb::Delete, "/api/rounds/9", None)
        .await
        .unwrap();
    assert_eq!(data, Value::Null);
}
