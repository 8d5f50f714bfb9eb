use std::fmt;

/// An error that dictates its own HTTP status code. Its `Display` text is
/// trusted to be safe for clients.
pub trait StatusCarrying {
    fn status_code(&self) -> u16;
}

/// An error that may describe a missing resource.
pub trait NotFound {
    fn is_not_found(&self) -> bool;
}

/// An error that may describe an attempt to create a resource that already exists.
pub trait AlreadyExists {
    fn is_already_exists(&self) -> bool;
}

/// An error that may describe a request conflicting with current resource state.
pub trait Conflict {
    fn is_conflict(&self) -> bool;
}

/// A client-safe message replacing the generic text of a classified response.
pub trait UserMessage {
    fn user_message(&self) -> &str;
}

/// Runtime capability lookup for errors handed to the responder.
///
/// Every accessor defaults to `None`, so a plain `impl ApiError for MyError {}`
/// yields an unclassified error. Types opt in to a capability by implementing
/// the capability trait and returning `Some(self)` from the matching accessor:
///
/// ```
/// use api_responder::errors::{ApiError, NotFound};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("user {0} missing")]
/// struct MissingUser(u64);
///
/// impl NotFound for MissingUser {
///     fn is_not_found(&self) -> bool {
///         true
///     }
/// }
///
/// impl ApiError for MissingUser {
///     fn as_not_found(&self) -> Option<&dyn NotFound> {
///         Some(self)
///     }
/// }
/// ```
pub trait ApiError: fmt::Display + fmt::Debug + Send + Sync {
    fn as_status_carrying(&self) -> Option<&dyn StatusCarrying> {
        None
    }

    fn as_not_found(&self) -> Option<&dyn NotFound> {
        None
    }

    fn as_already_exists(&self) -> Option<&dyn AlreadyExists> {
        None
    }

    fn as_conflict(&self) -> Option<&dyn Conflict> {
        None
    }

    fn as_user_message(&self) -> Option<&dyn UserMessage> {
        None
    }
}

// Foreign errors carry no capabilities and always classify as internal.
impl ApiError for anyhow::Error {}
impl ApiError for serde_json::Error {}
impl ApiError for std::io::Error {}
impl ApiError for Box<dyn std::error::Error + Send + Sync> {}
