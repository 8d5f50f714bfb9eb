use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Note {
    pub id: String,
    pub body: String,
    /// Incremented on every update, used for optimistic concurrency
    pub version: u64,
}

/// Request body for creating a note
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewNote {
    pub id: String,
    pub body: String,
}

/// Request body for updating a note
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NoteUpdate {
    pub body: String,
    /// Version the update was based on
    pub version: u64,
}
