use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use utoipa::OpenApi;

use super::openapi::ApiDoc;
use crate::errors::{ApiError, ErrorEnvelope, HttpError, NotFound};
use crate::models::note::{NewNote, Note, NoteUpdate};
use crate::responder::{RequestMeta, Responder};
use crate::store::NoteStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: NoteStore,
    pub responder: Responder,
    pub started_at: Instant,
}

impl AppStateInner {
    pub fn new(store: NoteStore, responder: Responder) -> Self {
        Self {
            store,
            responder,
            started_at: Instant::now(),
        }
    }
}

/// Body extraction failures are the client's fault and carry their own status.
fn bad_body(rejection: JsonRejection) -> HttpError {
    HttpError::msg(rejection.body_text(), rejection.status().as_u16())
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>, meta: RequestMeta) -> Response {
    let body = serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    });
    state.responder.success(&meta, StatusCode::OK, Some(&body))
}

/// List all notes
#[utoipa::path(
    get,
    path = "/notes",
    tag = "notes",
    responses(
        (status = 200, description = "All notes ordered by id", body = Vec<Note>)
    )
)]
pub async fn list_notes(State(state): State<AppState>, meta: RequestMeta) -> Response {
    let notes = state.store.list().await;
    state.responder.success(&meta, StatusCode::OK, Some(&notes))
}

/// Fetch a note by id
#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 404, description = "No such note", body = ErrorEnvelope)
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> Response {
    match state.store.get(&id).await {
        Ok(note) => state.responder.success(&meta, StatusCode::OK, Some(&note)),
        Err(e) => state.responder.error(&meta, &e),
    }
}

/// Create a note
#[utoipa::path(
    post,
    path = "/notes",
    tag = "notes",
    request_body = NewNote,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 400, description = "Invalid note", body = ErrorEnvelope),
        (status = 422, description = "Note already exists", body = ErrorEnvelope)
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    meta: RequestMeta,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> Response {
    let Json(new) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return state.responder.error(&meta, &bad_body(rejection)),
    };

    match state.store.create(new).await {
        Ok(note) => state
            .responder
            .success(&meta, StatusCode::CREATED, Some(&note)),
        Err(e) => state.responder.error(&meta, &e),
    }
}

/// Replace a note's body
#[utoipa::path(
    put,
    path = "/notes/{id}",
    tag = "notes",
    params(("id" = String, Path, description = "Note id")),
    request_body = NoteUpdate,
    responses(
        (status = 200, description = "Note updated", body = Note),
        (status = 404, description = "No such note", body = ErrorEnvelope),
        (status = 422, description = "Note changed since the given version", body = ErrorEnvelope)
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path(id): Path<String>,
    payload: Result<Json<NoteUpdate>, JsonRejection>,
) -> Response {
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return state.responder.error(&meta, &bad_body(rejection)),
    };

    match state.store.update(&id, update).await {
        Ok(note) => state.responder.success(&meta, StatusCode::OK, Some(&note)),
        Err(e) => state.responder.error(&meta, &e),
    }
}

/// Delete a note
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "No such note", body = ErrorEnvelope)
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> Response {
    match state.store.delete(&id).await {
        Ok(()) => state.responder.empty(&meta, StatusCode::NO_CONTENT),
        Err(e) => state.responder.error(&meta, &e),
    }
}

/// OpenAPI document
pub async fn openapi_json(State(state): State<AppState>, meta: RequestMeta) -> Response {
    state
        .responder
        .success(&meta, StatusCode::OK, Some(&ApiDoc::openapi()))
}

#[derive(Debug, Error)]
#[error("no route for {method} {path}")]
struct UnknownRoute {
    method: Method,
    path: String,
}

impl NotFound for UnknownRoute {
    fn is_not_found(&self) -> bool {
        true
    }
}

impl ApiError for UnknownRoute {
    fn as_not_found(&self) -> Option<&dyn NotFound> {
        Some(self)
    }
}

/// Fallback for unknown routes
pub async fn not_found(State(state): State<AppState>, meta: RequestMeta) -> Response {
    let err = UnknownRoute {
        method: meta.method.clone(),
        path: meta.path().to_string(),
    };
    state.responder.error(&meta, &err)
}
