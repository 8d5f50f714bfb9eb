use utoipa::OpenApi;

use crate::errors::{ErrorBody, ErrorEnvelope};
use crate::models::note::{NewNote, Note, NoteUpdate};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Responder",
        version = "0.1.0",
        description = "Notes service demonstrating uniform JSON success and error responses. Every error is answered with an envelope carrying the request ID and a client-safe message."
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::list_notes,
        crate::api::handlers::get_note,
        crate::api::handlers::create_note,
        crate::api::handlers::update_note,
        crate::api::handlers::delete_note,
    ),
    components(
        schemas(
            Note,
            NewNote,
            NoteUpdate,
            ErrorEnvelope,
            ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "notes", description = "Note storage endpoints"),
    )
)]
pub struct ApiDoc;
