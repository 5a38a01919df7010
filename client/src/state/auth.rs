//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionStore` lives for the lifetime of the host process. The HTTP
//! client reads the access token from it before every request and writes the
//! rotated pair back after a refresh; endpoint wrappers write it on login and
//! profile edits. Every change is mirrored to a [`KeyValueStore`] under the
//! keys `accessToken`, `refreshToken` and `user` so a restart can restore it.
//!
//! EVENTS
//! ======
//! Mutations publish a [`SessionEvent`] on a broadcast channel. Hosts react
//! to [`SessionEvent::Invalidated`] (the refresh protocol gave up) by sending
//! the user back to sign-in; the store itself never navigates.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

use crate::net::types::User;
use crate::util::storage::{KeyValueStore, StorageError, load_json, save_json};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

const EVENT_CAPACITY: usize = 32;

/// Snapshot of the cached session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
}

/// Notifications published after each session mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    UserUpdated,
    TokensRefreshed,
    SignedOut,
    /// Credentials were cleared because they could not be renewed.
    Invalidated,
}

struct Inner {
    state: AuthState,
    initialized: bool,
}

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    inner: Mutex<Inner>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            inner: Mutex::new(Inner { state: AuthState::default(), initialized: false }),
            events,
        }
    }

    /// Receive every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock().state.access_token.clone()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.lock().state.refresh_token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().state.user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().state.is_authenticated
    }

    /// Restore the session from storage on the first call; later calls return
    /// the current state untouched.
    ///
    /// Only a complete triple restores the session. Unreadable storage or a
    /// user record that does not parse clears storage instead of failing.
    pub fn init_auth(&self) -> AuthState {
        let mut inner = self.lock();
        if inner.initialized {
            return inner.state.clone();
        }
        inner.initialized = true;

        match self.read_stored() {
            Ok(Some(restored)) => {
                tracing::debug!(user_id = %restored.user.as_ref().map_or("", |u| u.id.as_str()), "session restored");
                inner.state = restored;
            }
            Ok(None) => {
                tracing::debug!("no stored session");
                inner.state = AuthState::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored session unreadable; clearing");
                inner.state = AuthState::default();
                self.clear_storage();
            }
        }
        inner.state.clone()
    }

    /// Store a fresh sign-in.
    ///
    /// Memory is updated even when persisting fails, so the current process
    /// stays signed in.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the session could not be persisted.
    pub fn set_auth(&self, user: User, access_token: &str, refresh_token: &str) -> Result<(), StorageError> {
        let persisted = self.persist_all(&user, access_token, refresh_token);
        {
            let mut inner = self.lock();
            inner.initialized = true;
            inner.state = AuthState {
                user: Some(user),
                access_token: Some(access_token.to_owned()),
                refresh_token: Some(refresh_token.to_owned()),
                is_authenticated: true,
            };
        }
        self.publish(SessionEvent::SignedIn);
        persisted
    }

    /// Replace the cached user (after a profile edit), keeping the tokens.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the user could not be persisted.
    pub fn update_user(&self, user: User) -> Result<(), StorageError> {
        let persisted = save_json(self.storage.as_ref(), USER_KEY, &user);
        self.lock().state.user = Some(user);
        self.publish(SessionEvent::UserUpdated);
        persisted
    }

    /// Store the pair returned by a token refresh. A `None` user keeps the
    /// cached one.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the tokens could not be persisted.
    pub fn store_refreshed_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
        user: Option<User>,
    ) -> Result<(), StorageError> {
        let persisted = {
            let mut inner = self.lock();
            if let Some(user) = user {
                inner.state.user = Some(user);
            }
            inner.state.access_token = Some(access_token.to_owned());
            inner.state.refresh_token = Some(refresh_token.to_owned());
            inner.state.is_authenticated = inner.state.user.is_some();
            match &inner.state.user {
                Some(user) => self.persist_all(user, access_token, refresh_token),
                None => self.persist_tokens(access_token, refresh_token),
            }
        };
        self.publish(SessionEvent::TokensRefreshed);
        persisted
    }

    /// Sign out: clear memory and storage.
    pub fn logout(&self) {
        self.clear();
        self.publish(SessionEvent::SignedOut);
    }

    /// Clear credentials that could not be renewed and tell subscribers to
    /// send the user back to sign-in.
    pub fn invalidate(&self) {
        self.clear();
        self.publish(SessionEvent::Invalidated);
    }

    // -------------------------------------------------------------------------

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: SessionEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    fn clear(&self) {
        {
            let mut inner = self.lock();
            inner.initialized = true;
            inner.state = AuthState::default();
        }
        self.clear_storage();
    }

    fn clear_storage(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear stored session key");
            }
        }
    }

    fn read_stored(&self) -> Result<Option<AuthState>, StorageError> {
        let access_token = self.storage.get(ACCESS_TOKEN_KEY)?;
        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY)?;
        let user: Option<User> = load_json(self.storage.as_ref(), USER_KEY)?;

        match (access_token, refresh_token, user) {
            (Some(access), Some(refresh), Some(user)) if !access.is_empty() && !refresh.is_empty() => {
                Ok(Some(AuthState {
                    user: Some(user),
                    access_token: Some(access),
                    refresh_token: Some(refresh),
                    is_authenticated: true,
                }))
            }
            _ => Ok(None),
        }
    }

    fn persist_all(&self, user: &User, access_token: &str, refresh_token: &str) -> Result<(), StorageError> {
        self.persist_tokens(access_token, refresh_token)?;
        save_json(self.storage.as_ref(), USER_KEY, user)
    }

    fn persist_tokens(&self, access_token: &str, refresh_token: &str) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, access_token)?;
        self.storage.set(REFRESH_TOKEN_KEY, refresh_token)
    }
}
