use thiserror::Error;

use super::capabilities::{ApiError, StatusCarrying};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Wraps an error with the HTTP status code it should be answered with.
///
/// The wrapped error's text is sent to the client verbatim, so only wrap
/// errors whose message is safe to expose.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct HttpError {
    source: BoxError,
    code: u16,
}

impl HttpError {
    pub fn new(source: impl Into<BoxError>, code: u16) -> Self {
        Self {
            source: source.into(),
            code,
        }
    }

    /// Status-carrying error built from a plain message.
    pub fn msg(message: impl Into<String>, code: u16) -> Self {
        Self::new(message.into(), code)
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn into_inner(self) -> BoxError {
        self.source
    }
}

impl StatusCarrying for HttpError {
    fn status_code(&self) -> u16 {
        self.code
    }
}

impl ApiError for HttpError {
    fn as_status_carrying(&self) -> Option<&dyn StatusCarrying> {
        Some(self)
    }
}

/// Failures raised while producing a response.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("failed to encode response object: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError for ResponderError {}

/// Failures of the response transport once the status line is committed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to copy response bytes: {0}")]
    Io(#[from] std::io::Error),
}
