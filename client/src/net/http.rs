//! Authenticated HTTP client for the recruitment platform API.
//!
//! ARCHITECTURE
//! ============
//! Every request goes through [`ApiClient::execute`]:
//! 1. attach `Authorization: Bearer <token>` when a token is cached;
//! 2. on a 401, join the refresh protocol in [`super::refresh`]: the first
//!    failing request refreshes, the rest wait for it;
//! 3. retry the original request exactly once with the new token. A second
//!    401 is returned to the caller as [`ApiError::Unauthorized`].
//!
//! A failed refresh, whether the server rejected the refresh token, the
//! network failed, or no refresh token was cached, invalidates the session.
//! Public requests (credential exchange) skip both the header and the
//! refresh protocol.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses and envelopes with `success: false` become `ApiError`
//! values carrying the server's `message`, `code` and `reason`, so callers
//! can show the server text or fall back to a generic one.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::refresh::{RefreshFailed, RefreshGate, Ticket};
use super::types::{ApiEnvelope, TokenPair};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::state::auth::SessionStore;

pub const REFRESH_PATH: &str = "/auth/refresh";

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// A request description that can be dispatched more than once.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    public: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None, public: false }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append query pairs.
    #[must_use]
    pub fn query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Send without a bearer token and without refresh handling.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.public
    }
}

/// Raw status and body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the envelope, turning error statuses and `success: false` into
    /// errors.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for 401, `Status` for other non-2xx, `Parse` for a
    /// malformed body, `Rejected` for `success: false`.
    pub fn into_envelope<T: DeserializeOwned>(self) -> Result<ApiEnvelope<T>, ApiError> {
        if !self.is_success() {
            let ErrorParts { message, code, reason } = error_parts(&self.body);
            if self.status == 401 {
                return Err(ApiError::Unauthorized { message });
            }
            return Err(ApiError::Status { status: self.status, message, code, reason });
        }
        let envelope: ApiEnvelope<T> = serde_json::from_str(&self.body)?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                message: envelope.message,
                code: envelope.code,
                reason: envelope.reason,
            });
        }
        Ok(envelope)
    }

    /// Decode the envelope and return its `data`.
    ///
    /// # Errors
    ///
    /// As [`Self::into_envelope`], plus `MissingData` when `data` is absent.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        self.into_envelope::<T>()?.data.ok_or(ApiError::MissingData)
    }

    /// Decode the envelope and return its `message`, ignoring any `data`.
    ///
    /// # Errors
    ///
    /// As [`Self::into_envelope`].
    pub fn into_message(self) -> Result<String, ApiError> {
        Ok(self.into_envelope::<serde_json::Value>()?.message)
    }
}

struct ErrorParts {
    message: String,
    code: Option<String>,
    reason: Option<String>,
}

fn error_parts(body: &str) -> ErrorParts {
    let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) else {
        return ErrorParts { message: String::new(), code: None, reason: None };
    };
    let message = if envelope.message.trim().is_empty() {
        envelope
            .error
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned()
    } else {
        envelope.message
    };
    ErrorParts { message, code: envelope.code, reason: envelope.reason }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, thiserror::Error)]
enum RefreshError {
    #[error("no refresh token cached")]
    MissingRefreshToken,
    #[error("refresh request failed: {0}")]
    Request(#[from] ApiError),
    #[error("refresh rejected with status {status}")]
    Rejected { status: u16 },
    #[error("refresh response malformed: {0}")]
    Malformed(String),
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    gate: RefreshGate,
}

/// Cloneable handle; clones share the session and the refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Build a client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns `ClientBuild` if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self::with_http(http, &config.base_url, session))
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub fn with_http(http: reqwest::Client, base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: base_url.trim_end_matches('/').to_owned(),
                session,
                gate: RefreshGate::new(),
            }),
        }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Whether a token refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.inner.gate.is_refreshing()
    }

    /// Requests parked behind the in-flight refresh.
    #[must_use]
    pub fn queued_requests(&self) -> usize {
        self.inner.gate.queued()
    }

    /// Send `request` and decode the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Transport, status, envelope, and auth failures as [`ApiError`].
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute(&request).await?.into_data()
    }

    /// Send `request` and return the envelope's `message`.
    ///
    /// # Errors
    ///
    /// Transport, status, envelope, and auth failures as [`ApiError`].
    pub async fn send_message(&self, request: ApiRequest) -> Result<String, ApiError> {
        self.execute(&request).await?.into_message()
    }

    /// Dispatch with the auth interceptor and return the raw response.
    ///
    /// The result is the response to the original attempt, or to its single
    /// retry after a token refresh.
    ///
    /// # Errors
    ///
    /// `Http` on transport failure, `SessionExpired` when the refresh failed,
    /// `Unauthorized` when the retry is rejected again.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        if request.public {
            return self.dispatch(request, None).await;
        }

        let sent_with = self.inner.session.access_token();
        let response = self.dispatch(request, sent_with.as_deref()).await?;
        if response.status != 401 {
            return Ok(response);
        }

        let token = self.recover_access(sent_with.as_deref()).await?;
        let retried = self.dispatch(request, Some(&token)).await?;
        if retried.status == 401 {
            tracing::warn!(method = %request.method, path = %request.path, "still unauthorized after refresh");
            return Err(ApiError::Unauthorized { message: error_parts(&retried.body).message });
        }
        Ok(retried)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.inner.base_url)
        } else {
            format!("{}/{path}", self.inner.base_url)
        }
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(method = %request.method, path = %request.path, status, "api request");
        Ok(ApiResponse { status, body })
    }

    /// Obtain a usable access token after a 401 for a request sent with
    /// `sent_with`.
    async fn recover_access(&self, sent_with: Option<&str>) -> Result<String, ApiError> {
        let session = &self.inner.session;
        match self.inner.gate.enter(sent_with, || session.access_token()) {
            Ticket::Fresh(token) => Ok(token),
            Ticket::Expired => Err(ApiError::SessionExpired),
            Ticket::Wait(rx) => match rx.await {
                Ok(Ok(token)) => Ok(token),
                Ok(Err(RefreshFailed)) | Err(_) => Err(ApiError::SessionExpired),
            },
            Ticket::Lead(lead) => {
                tracing::info!("access token rejected; refreshing");
                match self.refresh_tokens().await {
                    Ok(token) => {
                        let released = lead.finish(Ok(token.clone()));
                        tracing::info!(released, "token refresh succeeded");
                        Ok(token)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "token refresh failed; invalidating session");
                        session.invalidate();
                        let released = lead.finish(Err(RefreshFailed));
                        tracing::debug!(released, "queued requests rejected");
                        Err(ApiError::SessionExpired)
                    }
                }
            }
        }
    }

    async fn refresh_tokens(&self) -> Result<String, RefreshError> {
        let session = &self.inner.session;
        let refresh_token = session
            .refresh_token()
            .filter(|t| !t.is_empty())
            .ok_or(RefreshError::MissingRefreshToken)?;

        let request = ApiRequest::post(REFRESH_PATH)
            .query([("refresh_token".to_owned(), refresh_token)])
            .public();
        let response = self.dispatch(&request, None).await?;
        let pair = parse_token_pair(&response)?;

        if let Err(e) = session.store_refreshed_tokens(&pair.access_token, &pair.refresh_token, pair.user) {
            tracing::warn!(error = %e, "refreshed tokens not persisted");
        }
        Ok(pair.access_token)
    }
}

/// Accepts the pair inside the standard envelope or as a bare body.
fn parse_token_pair(response: &ApiResponse) -> Result<TokenPair, RefreshError> {
    if !response.is_success() {
        return Err(RefreshError::Rejected { status: response.status });
    }
    let pair = match serde_json::from_str::<ApiEnvelope<TokenPair>>(&response.body) {
        Ok(ApiEnvelope { success: true, data: Some(pair), .. }) => pair,
        Ok(ApiEnvelope { success: false, data: Some(_), .. }) => {
            return Err(RefreshError::Rejected { status: response.status });
        }
        _ => serde_json::from_str::<TokenPair>(&response.body).map_err(|e| RefreshError::Malformed(e.to_string()))?,
    };
    if pair.access_token.is_empty() {
        return Err(RefreshError::Malformed("empty access token".to_owned()));
    }
    Ok(pair)
}
