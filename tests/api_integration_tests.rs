use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::Response,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use tracing::Span;

use api_responder::api::{extract, handlers::AppStateInner, routes::create_router};
use api_responder::responder::Responder;
use api_responder::store::NoteStore;

// Helper to create test app
fn create_test_app() -> axum::Router {
    let responder = Responder::builder(Span::none())
        .request_id_fn(Some(extract::request_id))
        .client_ip_fn(Some(extract::client_ip))
        .build();
    let state = Arc::new(AppStateInner::new(NoteStore::new(), responder));
    create_router(state)
}

async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(json!({}))
}

// Helper to send request and parse JSON response
async fn send_json_request(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = send(app, request).await;
    (response.status(), body_json(response).await)
}

// Helper to send JSON request with JSON body
async fn send_json_body_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let bytes = serde_json::to_vec(&body).unwrap();
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .unwrap();

    let response = send(app, request).await;
    (response.status(), body_json(response).await)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let (status, body) = send_json_request(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "api-responder");
}

#[tokio::test]
async fn test_create_then_get_note() {
    let app = create_test_app();
    let (status, body) = send_json_body_request(
        &app,
        "POST",
        "/notes",
        json!({ "id": "groceries", "body": "eggs" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["version"], 1);

    let (status, body) = send_json_request(&app, "GET", "/notes/groceries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["body"], "eggs");
}

#[tokio::test]
async fn test_missing_note_returns_envelope_with_request_id() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/notes/nope")
        .header("x-request-id", "req-from-client")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    assert_eq!(response.headers()["x-request-id"], "req-from-client");

    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "request_id": "req-from-client",
            "error": { "message": "note not found" }
        })
    );
}

#[tokio::test]
async fn test_generated_request_id_matches_header() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/notes/nope")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    let header = response.headers()["x-request-id"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(!header.is_empty());

    let body = body_json(response).await;
    assert_eq!(body["request_id"], header.as_str());
}

#[tokio::test]
async fn test_duplicate_note_is_422() {
    let app = create_test_app();
    let note = json!({ "id": "a", "body": "first" });
    send_json_body_request(&app, "POST", "/notes", note.clone()).await;

    let (status, body) = send_json_body_request(&app, "POST", "/notes", note).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "resource exists");
}

#[tokio::test]
async fn test_stale_update_is_422() {
    let app = create_test_app();
    send_json_body_request(&app, "POST", "/notes", json!({ "id": "a", "body": "v1" })).await;

    let update = json!({ "body": "v2", "version": 1 });
    let (status, body) = send_json_body_request(&app, "PUT", "/notes/a", update.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 2);

    let (status, body) = send_json_body_request(&app, "PUT", "/notes/a", update).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"]["message"],
        "note was modified by another request"
    );
}

#[tokio::test]
async fn test_invalid_note_exposes_validation_message() {
    let app = create_test_app();
    let (status, body) =
        send_json_body_request(&app, "POST", "/notes", json!({ "id": "", "body": "x" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "note id must not be empty");
}

#[tokio::test]
async fn test_malformed_json_uses_rejection_status() {
    let app = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/notes")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"]["message"].is_string());
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_delete_returns_empty_204() {
    let app = create_test_app();
    send_json_body_request(&app, "POST", "/notes", json!({ "id": "a", "body": "x" })).await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/notes/a")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());

    let (status, _) = send_json_request(&app, "DELETE", "/notes/a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_notes() {
    let app = create_test_app();
    for id in ["b", "a"] {
        send_json_body_request(&app, "POST", "/notes", json!({ "id": id, "body": "x" })).await;
    }

    let (status, body) = send_json_request(&app, "GET", "/notes").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["id"].as_str())
        .collect();
    assert_eq!(ids, ["a", "b"]);
}

#[tokio::test]
async fn test_unknown_route_is_generic_404() {
    let app = create_test_app();
    let (status, body) = send_json_request(&app, "GET", "/nothing/here").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "resource not found");
}

#[tokio::test]
async fn test_openapi_document_lists_error_envelope() {
    let app = create_test_app();
    let (status, body) = send_json_request(&app, "GET", "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/notes/{id}"].is_object());
    assert!(body["components"]["schemas"]["ErrorEnvelope"].is_object());
}
