//! Host hook for session invalidation.
//!
//! SYSTEM CONTEXT
//! ==============
//! When the refresh protocol gives up, the session publishes
//! [`SessionEvent::Invalidated`]. Hosts decide what "send the user back to
//! sign-in" means (a route change, a prompt, an exit code) by installing a
//! callback here instead of the client navigating on its own.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::state::auth::{SessionEvent, SessionStore};

/// Call `on_invalidated` for every [`SessionEvent::Invalidated`] until the
/// session is dropped.
///
/// Subscribes before returning, so an invalidation that happens right after
/// this call is not missed. If the listener falls behind and events are
/// skipped, it calls `on_invalidated` when the session is signed out at that
/// point, so the callback may run more than once per invalidation. Must be
/// called inside a tokio runtime.
pub fn spawn_invalidation_listener<F>(session: &Arc<SessionStore>, on_invalidated: F) -> JoinHandle<()>
where
    F: Fn() + Send + 'static,
{
    let mut events = session.subscribe();
    let session = Arc::downgrade(session);
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Invalidated) => on_invalidated(),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    let signed_out = session.upgrade().is_some_and(|s| !s.is_authenticated());
                    tracing::warn!(skipped, signed_out, "session listener lagged");
                    if signed_out {
                        on_invalidated();
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
