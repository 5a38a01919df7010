//! Error types for API calls and the toast text shown for them.
//!
//! ERROR HANDLING
//! ==============
//! Three families reach callers: validation failures raised before any
//! network call, transport/API failures carrying the server's message, and
//! auth failures that the refresh protocol could not recover from. None of
//! them is fatal; the worst case is an invalidated session.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::util::storage::StorageError;
use crate::util::validation::FieldErrors;

/// Shown when the server gave no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Errors produced by [`crate::net::http::ApiClient`] and the endpoint wrappers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
        code: Option<String>,
        reason: Option<String>,
    },

    /// The server answered 2xx but the envelope reported `success: false`.
    #[error("request rejected: {message}")]
    Rejected {
        message: String,
        code: Option<String>,
        reason: Option<String>,
    },

    /// The envelope was successful but carried no `data`.
    #[error("response envelope missing data")]
    MissingData,

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Still unauthorized after the single retry, or unauthorized on a public request.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The token refresh failed and the session was invalidated.
    #[error("session expired")]
    SessionExpired,

    /// Session persistence failed.
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),

    /// A form failed validation; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
}

impl ApiError {
    /// Stable machine-readable code for logs and scripted callers.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "E_HTTP",
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Status { .. } => "E_API_STATUS",
            Self::Rejected { .. } => "E_API_REJECTED",
            Self::MissingData => "E_API_MISSING_DATA",
            Self::Parse(_) => "E_API_PARSE",
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::SessionExpired => "E_SESSION_EXPIRED",
            Self::Storage(_) => "E_STORAGE",
            Self::Validation(_) => "E_VALIDATION",
        }
    }

    /// Text for a transient notification: the server's message when it sent
    /// one, otherwise a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Rejected { message, .. } | Self::Unauthorized { message }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            Self::SessionExpired => SESSION_EXPIRED_MESSAGE.to_owned(),
            Self::Validation(errors) => errors
                .first_message()
                .map_or_else(|| GENERIC_ERROR_MESSAGE.to_owned(), str::to_owned),
            _ => GENERIC_ERROR_MESSAGE.to_owned(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
