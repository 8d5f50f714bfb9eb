use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Request ID for correlating with server logs (may be empty)
    pub request_id: String,
    /// Error details
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Client-safe error message
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            error: ErrorBody {
                message: message.into(),
            },
        }
    }
}
