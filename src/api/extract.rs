//! Request-ID and client-IP extractors handed to the responder

use std::net::SocketAddr;

use axum::extract::ConnectInfo;

use super::middleware::RequestId;
use crate::responder::RequestMeta;

/// Request ID assigned by the logging middleware, empty if it did not run
pub fn request_id(meta: &RequestMeta) -> String {
    meta.extensions
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

/// First `x-forwarded-for` hop, then `x-real-ip`, then the peer address.
pub fn client_ip(meta: &RequestMeta) -> String {
    header(meta, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(str::trim).map(str::to_string))
        .filter(|v| !v.is_empty())
        .or_else(|| header(meta, "x-real-ip").map(|v| v.trim().to_string()))
        .or_else(|| {
            meta.extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_default()
}

fn header<'a>(meta: &'a RequestMeta, name: &str) -> Option<&'a str> {
    meta.headers.get(name).and_then(|v| v.to_str().ok())
}
