//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `storage` persists the session, `validation` backs the form schemas, and
//! `auth` lets hosts react when the session is invalidated.

pub mod auth;
pub mod storage;
pub mod validation;
