use axum::http::StatusCode;

use super::capabilities::ApiError;

pub const NOT_FOUND_MESSAGE: &str = "resource not found";
pub const EXISTS_MESSAGE: &str = "resource exists";
pub const CONFLICT_MESSAGE: &str = "unprocessable entity";
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// Outcome of classifying an error for the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    /// Client-safe message placed in the error envelope
    pub message: String,
    /// Whether the occurrence warrants an error-severity log record
    pub log_as_error: bool,
}

impl Classification {
    fn expected(err: &dyn ApiError, status: StatusCode, default_message: &str) -> Self {
        let message = err
            .as_user_message()
            .map(|m| m.user_message().to_string())
            .unwrap_or_else(|| default_message.to_string());

        Self {
            status,
            message,
            log_as_error: false,
        }
    }
}

/// Map an error to a status code, a client message and a log severity.
///
/// Capabilities are checked in a fixed order and the first match wins:
/// status-carrying, not-found, already-exists, conflict. Anything else is an
/// internal error whose text never reaches the client.
pub fn classify(err: &dyn ApiError) -> Classification {
    if let Some(carrier) = err.as_status_carrying() {
        return Classification {
            status: StatusCode::from_u16(carrier.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: err.to_string(),
            log_as_error: true,
        };
    }

    if err.as_not_found().is_some_and(|e| e.is_not_found()) {
        return Classification::expected(err, StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
    }

    if err.as_already_exists().is_some_and(|e| e.is_already_exists()) {
        return Classification::expected(err, StatusCode::UNPROCESSABLE_ENTITY, EXISTS_MESSAGE);
    }

    if err.as_conflict().is_some_and(|e| e.is_conflict()) {
        return Classification::expected(err, StatusCode::UNPROCESSABLE_ENTITY, CONFLICT_MESSAGE);
    }

    Classification {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: INTERNAL_MESSAGE.to_string(),
        log_as_error: true,
    }
}
