//! Error classification for API responses

pub mod capabilities;
pub mod classify;
pub mod http_error;
pub mod response;

pub use capabilities::{AlreadyExists, ApiError, Conflict, NotFound, StatusCarrying, UserMessage};
pub use classify::{classify, Classification};
pub use http_error::{HttpError, ResponderError, TransportError};
pub use response::{ErrorBody, ErrorEnvelope};
