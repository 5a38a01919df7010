//! Process-wide client state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` holds the signed-in session shared by the HTTP client and the
//! endpoint wrappers.

pub mod auth;
