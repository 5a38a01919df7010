//! Typed wrappers for every REST endpoint the platform exposes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each submodule maps one area of the API (auth, jobs, applications,
//! profile, employer, admin) onto free async functions taking an
//! [`super::http::ApiClient`]. Forms are validated before anything is sent;
//! responses are decoded from the standard envelope into the DTOs in
//! [`super::types`].
//!
//! ERROR HANDLING
//! ==============
//! Every wrapper returns `Result<_, ApiError>`. Session side effects (sign-in
//! on login, user refresh on profile edits) happen only after the server
//! confirmed the change. A failure to persist that side effect is logged and
//! does not turn the confirmed change into an error.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[path = "api_admin.rs"]
pub mod admin;
#[path = "api_applications.rs"]
pub mod applications;
#[path = "api_auth.rs"]
pub mod auth;
#[path = "api_employer.rs"]
pub mod employer;
#[path = "api_jobs.rs"]
pub mod jobs;
#[path = "api_profile.rs"]
pub mod profile;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::ApiError;
use crate::util::storage::StorageError;
use crate::util::validation::{FieldErrors, Validate};

/// Run `form`'s validation, mapping failures to [`ApiError::Validation`].
fn validated<F: Validate>(form: &F) -> Result<(), ApiError> {
    form.validate().map_err(ApiError::Validation)
}

/// `base/{id}` with `id` trimmed and path-escaped.
fn item_path(base: &str, id: &str) -> String {
    format!("{base}/{}", escape_segment(id.trim()))
}

/// `base/{id}/action`.
fn action_path(base: &str, id: &str, action: &str) -> String {
    format!("{}/{action}", item_path(base, id))
}

/// Everything outside the RFC 3986 unreserved set.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn escape_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Reject an id that would address the collection instead of one item.
fn require_id(id: &str) -> Result<(), ApiError> {
    if id.trim().is_empty() {
        let mut errors = FieldErrors::new();
        errors.add("id", "This field is required");
        return Err(ApiError::Validation(errors));
    }
    Ok(())
}

fn log_persist_failure(result: Result<(), StorageError>, what: &'static str) {
    if let Err(e) = result {
        tracing::warn!(error = %e, what, "session change not persisted");
    }
}
