//! In-memory note storage

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::{AlreadyExists, ApiError, Conflict, NotFound, StatusCarrying, UserMessage};
use crate::models::note::{NewNote, Note, NoteUpdate};

pub const MAX_BODY_LEN: usize = 4096;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("note {0} not found")]
    NotFound(String),

    #[error("note {0} already exists")]
    AlreadyExists(String),

    #[error("note {id} is at version {current}, update was based on version {given}")]
    VersionConflict { id: String, current: u64, given: u64 },

    /// Rejected input; the text is shown to the client as is.
    #[error("{0}")]
    Invalid(String),
}

impl StoreError {
    fn client_message(&self) -> Option<&'static str> {
        match self {
            Self::NotFound(_) => Some("note not found"),
            Self::VersionConflict { .. } => Some("note was modified by another request"),
            _ => None,
        }
    }
}

impl StatusCarrying for StoreError {
    fn status_code(&self) -> u16 {
        400
    }
}

impl NotFound for StoreError {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl AlreadyExists for StoreError {
    fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}

impl Conflict for StoreError {
    fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

impl UserMessage for StoreError {
    fn user_message(&self) -> &str {
        self.client_message().unwrap_or_default()
    }
}

impl ApiError for StoreError {
    fn as_status_carrying(&self) -> Option<&dyn StatusCarrying> {
        match self {
            Self::Invalid(_) => Some(self),
            _ => None,
        }
    }

    fn as_not_found(&self) -> Option<&dyn NotFound> {
        Some(self)
    }

    fn as_already_exists(&self) -> Option<&dyn AlreadyExists> {
        Some(self)
    }

    fn as_conflict(&self) -> Option<&dyn Conflict> {
        Some(self)
    }

    fn as_user_message(&self) -> Option<&dyn UserMessage> {
        self.client_message().map(|_| self as &dyn UserMessage)
    }
}

#[derive(Debug, Default)]
pub struct NoteStore {
    notes: RwLock<HashMap<String, Note>>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notes ordered by id
    pub async fn list(&self) -> Vec<Note> {
        let notes = self.notes.read().await;
        let mut all: Vec<Note> = notes.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub async fn get(&self, id: &str) -> Result<Note, StoreError> {
        self.notes
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub async fn create(&self, new: NewNote) -> Result<Note, StoreError> {
        if new.id.trim().is_empty() {
            return Err(StoreError::Invalid("note id must not be empty".to_string()));
        }
        validate_body(&new.body)?;

        let mut notes = self.notes.write().await;
        if notes.contains_key(&new.id) {
            return Err(StoreError::AlreadyExists(new.id));
        }

        let note = Note {
            id: new.id,
            body: new.body,
            version: 1,
        };
        notes.insert(note.id.clone(), note.clone());
        debug!(id = %note.id, "note created");
        Ok(note)
    }

    pub async fn update(&self, id: &str, update: NoteUpdate) -> Result<Note, StoreError> {
        validate_body(&update.body)?;

        let mut notes = self.notes.write().await;
        let note = notes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if note.version != update.version {
            return Err(StoreError::VersionConflict {
                id: id.to_string(),
                current: note.version,
                given: update.version,
            });
        }

        note.body = update.body;
        note.version += 1;
        debug!(id, version = note.version, "note updated");
        Ok(note.clone())
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.notes
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

fn validate_body(body: &str) -> Result<(), StoreError> {
    if body.len() > MAX_BODY_LEN {
        return Err(StoreError::Invalid(format!(
            "note body must be at most {MAX_BODY_LEN} bytes"
        )));
    }
    Ok(())
}
