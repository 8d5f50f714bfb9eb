use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::errors::TransportError;

/// Destination of a response.
///
/// Headers and the status line must be written before any body bytes and
/// cannot be changed once the status line is written.
pub trait ResponseSink {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    fn write_status(&mut self, status: StatusCode);

    fn write_body(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

/// In-memory sink, turned into an axum response once written.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far; 200 if none was written
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl ResponseSink for ResponseRecorder {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.status.is_none() {
            self.headers.insert(name, value);
        }
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write_body(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

impl IntoResponse for ResponseRecorder {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}
