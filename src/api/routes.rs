use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_note, delete_note, get_note, health, list_notes, not_found, openapi_json, update_note,
    AppState,
};
use super::middleware::logging_middleware;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Notes
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/:id",
            get(get_note).put(update_note).delete(delete_note),
        )
        // OpenAPI documentation
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(not_found)
        // Add middleware (order matters: logging -> trace)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
