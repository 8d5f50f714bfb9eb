//! Writes JSON success payloads and classified error envelopes

pub mod meta;
pub mod sink;

use std::{fmt, sync::Arc};

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, debug_span, error, warn, Span};

use crate::errors::{classify, ApiError, ErrorEnvelope, ResponderError};

pub use meta::RequestMeta;
pub use sink::{ResponseRecorder, ResponseSink};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Reads the request ID from a request context
pub type RequestIdFn = Arc<dyn Fn(&RequestMeta) -> String + Send + Sync>;

/// Reads the client IP from a request context
pub type ClientIpFn = Arc<dyn Fn(&RequestMeta) -> String + Send + Sync>;

/// Plain extractor signature, handy for spelling an absent extractor:
/// `None::<ExtractFn>`.
pub type ExtractFn = fn(&RequestMeta) -> String;

fn empty_extractor() -> RequestIdFn {
    Arc::new(|_: &RequestMeta| String::new())
}

/// Writes API responses.
///
/// Holds only configuration fixed at construction, so one instance can be
/// cloned into every handler and used concurrently.
#[derive(Clone)]
pub struct Responder {
    log: Span,
    log_response_bodies: bool,
    request_id_fn: RequestIdFn,
    client_ip_fn: ClientIpFn,
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder")
            .field("log", &self.log)
            .field("log_response_bodies", &self.log_response_bodies)
            .finish_non_exhaustive()
    }
}

impl Responder {
    /// Responder with default options: empty request ID and client IP,
    /// response bodies not logged.
    pub fn new(log: Span) -> Self {
        Self::builder(log).build()
    }

    pub fn builder(log: Span) -> ResponderOptions {
        ResponderOptions {
            log,
            log_response_bodies: false,
            request_id_fn: empty_extractor(),
            client_ip_fn: empty_extractor(),
        }
    }

    /// Serialize `payload` and write it with `status`.
    ///
    /// `None` writes no body (e.g. for 204). A payload that fails to
    /// serialize is answered as an internal error instead, so the client
    /// never sees a partial body.
    pub fn respond_success<T>(
        &self,
        sink: &mut dyn ResponseSink,
        meta: &RequestMeta,
        status: StatusCode,
        payload: Option<&T>,
    ) where
        T: Serialize + ?Sized,
    {
        let body = match payload.map(encode).transpose() {
            Ok(body) => body.unwrap_or_default(),
            Err(err) => {
                self.respond_error(sink, meta, &ResponderError::from(err));
                return;
            }
        };

        self.write(sink, meta, status, &body);
    }

    /// Write `status` with no body.
    pub fn respond_empty(&self, sink: &mut dyn ResponseSink, meta: &RequestMeta, status: StatusCode) {
        self.respond_success::<()>(sink, meta, status, None);
    }

    /// Classify `err` and answer with its status and an error envelope.
    ///
    /// Internal and status-carrying errors are logged at error level with
    /// the request context; expected client errors are not.
    pub fn respond_error(&self, sink: &mut dyn ResponseSink, meta: &RequestMeta, err: &dyn ApiError) {
        let request_id = (self.request_id_fn)(meta);
        let mut guard = ErrorLog {
            log: &self.log,
            client_ip_fn: &self.client_ip_fn,
            meta,
            err,
            request_id: &request_id,
            armed: true,
        };

        let classification = classify(err);
        guard.armed = classification.log_as_error;

        let envelope = ErrorEnvelope::new(request_id.as_str(), classification.message);
        self.respond_success(sink, meta, classification.status, Some(&envelope));
    }

    /// [`Responder::respond_success`] into an axum response.
    pub fn success<T>(&self, meta: &RequestMeta, status: StatusCode, payload: Option<&T>) -> Response
    where
        T: Serialize + ?Sized,
    {
        let mut recorder = ResponseRecorder::new();
        self.respond_success(&mut recorder, meta, status, payload);
        recorder.into_response()
    }

    /// [`Responder::respond_empty`] into an axum response.
    pub fn empty(&self, meta: &RequestMeta, status: StatusCode) -> Response {
        let mut recorder = ResponseRecorder::new();
        self.respond_empty(&mut recorder, meta, status);
        recorder.into_response()
    }

    /// [`Responder::respond_error`] into an axum response.
    pub fn error(&self, meta: &RequestMeta, err: &dyn ApiError) -> Response {
        let mut recorder = ResponseRecorder::new();
        self.respond_error(&mut recorder, meta, err);
        recorder.into_response()
    }

    fn write(&self, sink: &mut dyn ResponseSink, meta: &RequestMeta, status: StatusCode, body: &[u8]) {
        let request_id = (self.request_id_fn)(meta);
        let log = debug_span!(parent: &self.log, "api_response", request_id = %request_id);

        if self.log_response_bodies {
            let body = String::from_utf8_lossy(body);
            debug!(parent: &log, status = status.as_u16(), body = %body, "api_response");
        } else {
            debug!(parent: &log, status = status.as_u16(), "api_response");
        }

        sink.set_header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        sink.write_status(status);
        if body.is_empty() {
            return;
        }

        if let Err(err) = sink.write_body(body) {
            warn!(parent: &log, error = %err, "api_response_copy_error");
        }
    }
}

/// Tab-indented JSON followed by a newline.
fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut ser = serde_json::Serializer::with_formatter(Vec::new(), PrettyFormatter::with_indent(b"\t"));
    payload.serialize(&mut ser)?;
    let mut buf = ser.into_inner();
    buf.push(b'\n');
    Ok(buf)
}

/// Emits the error record when dropped, whichever way `respond_error` exits.
struct ErrorLog<'a> {
    log: &'a Span,
    client_ip_fn: &'a ClientIpFn,
    meta: &'a RequestMeta,
    err: &'a dyn ApiError,
    request_id: &'a str,
    armed: bool,
}

impl Drop for ErrorLog<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let client_ip = (self.client_ip_fn)(self.meta);
        error!(
            parent: self.log,
            method = %self.meta.method,
            path = self.meta.path(),
            query = self.meta.query(),
            error = %self.err,
            client_ip = %client_ip,
            request_id = self.request_id,
            "api_response_error"
        );
    }
}

/// Builder for [`Responder`].
///
/// Extractor setters take an `Option`; `None` keeps whatever was configured
/// before, so options can be composed conditionally.
pub struct ResponderOptions {
    log: Span,
    log_response_bodies: bool,
    request_id_fn: RequestIdFn,
    client_ip_fn: ClientIpFn,
}

impl ResponderOptions {
    /// Log response bodies at debug level
    pub fn log_response_bodies(mut self, enabled: bool) -> Self {
        self.log_response_bodies = enabled;
        self
    }

    pub fn request_id_fn<F>(mut self, f: Option<F>) -> Self
    where
        F: Fn(&RequestMeta) -> String + Send + Sync + 'static,
    {
        if let Some(f) = f {
            self.request_id_fn = Arc::new(f);
        }
        self
    }

    pub fn client_ip_fn<F>(mut self, f: Option<F>) -> Self
    where
        F: Fn(&RequestMeta) -> String + Send + Sync + 'static,
    {
        if let Some(f) = f {
            self.client_ip_fn = Arc::new(f);
        }
        self
    }

    pub fn build(self) -> Responder {
        Responder {
            log: self.log,
            log_response_bodies: self.log_response_bodies,
            request_id_fn: self.request_id_fn,
            client_ip_fn: self.client_ip_fn,
        }
    }
}
