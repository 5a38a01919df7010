//! # jobhub-client
//!
//! Client library for the JobHub recruitment platform API.
//!
//! The crate keeps an auth session (access token, refresh token, user)
//! mirrored to durable key-value storage, attaches the access token to every
//! request, and transparently renews it on a 401: one refresh per wave of
//! expired requests, each retried exactly once. Typed endpoint wrappers and
//! validated form payloads sit on top.

pub mod config;
pub mod error;
pub mod forms;
pub mod net;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use error::ApiError;
pub use net::http::{ApiClient, ApiRequest, ApiResponse};
pub use state::auth::{AuthState, SessionEvent, SessionStore};
pub use util::auth::spawn_invalidation_listener;
pub use util::storage::{FileStore, KeyValueStore, MemoryStore};
