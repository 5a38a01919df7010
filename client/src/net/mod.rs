//! Networking for the recruitment platform REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` owns the authenticated client and its refresh interceptor,
//! `refresh` the single-flight gate behind it, `api` the typed endpoint
//! wrappers, and `types` the shared wire schema.

pub mod api;
pub mod http;
mod refresh;
pub mod types;

