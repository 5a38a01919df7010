//! In-process mock of the recruitment API for client tests.
//!
//! Routes are canned `(method, path) -> (status, body)` entries. Protected
//! routes answer 401 unless the request carries the currently valid bearer
//! token. `POST /auth/refresh` is built in: it counts calls, optionally
//! sleeps, then rotates the valid token, rejects, or drops the connection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use serde_json::{Value, json};

use crate::net::http::ApiClient;
use crate::net::types::{Role, User};
use crate::state::auth::SessionStore;
use crate::util::storage::MemoryStore;

const PREFIX: &str = "/api";

#[derive(Clone)]
struct MockRoute {
    status: u16,
    body: Value,
    protected: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Clone)]
enum RefreshMode {
    Succeed { access: String, refresh: String, user: Option<Value>, bare: bool },
    Fail,
    Disconnect,
}

struct MockState {
    routes: Mutex<HashMap<(String, String), MockRoute>>,
    valid_token: Mutex<String>,
    refresh_mode: Mutex<RefreshMode>,
    refresh_delay: Mutex<Duration>,
    refresh_calls: AtomicUsize,
    requests: Mutex<Vec<Recorded>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct MockApi {
    state: Arc<MockState>,
    base_url: String,
}

impl MockApi {
    /// Bind on an ephemeral port. The valid token starts as `A1` and refresh
    /// rotates to `A2`/`R2`.
    pub(crate) async fn start() -> Self {
        let state = Arc::new(MockState {
            routes: Mutex::new(HashMap::new()),
            valid_token: Mutex::new("A1".to_owned()),
            refresh_mode: Mutex::new(RefreshMode::Succeed {
                access: "A2".to_owned(),
                refresh: "R2".to_owned(),
                user: None,
                bare: false,
            }),
            refresh_delay: Mutex::new(Duration::ZERO),
            refresh_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock api");
        let addr = listener.local_addr().expect("mock api addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { state, base_url: format!("http://{addr}{PREFIX}") }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Unprotected route with a fixed answer.
    pub(crate) fn route(&self, method: Method, path: &str, status: u16, body: Value) {
        self.insert(method, path, MockRoute { status, body, protected: false });
    }

    /// Route that answers 200 with `body` only for the valid bearer token.
    pub(crate) fn protected(&self, method: Method, path: &str, body: Value) {
        self.insert(method, path, MockRoute { status: 200, body, protected: true });
    }

    /// Same as [`Self::protected`], wrapping `data` in a success envelope.
    pub(crate) fn protected_data(&self, method: Method, path: &str, data: Value) {
        self.protected(method, path, json!({ "success": true, "message": "OK", "data": data }));
    }

    pub(crate) fn refresh_succeeds(&self, access: &str, refresh: &str, user: Option<Value>) {
        *lock(&self.state.refresh_mode) = RefreshMode::Succeed {
            access: access.to_owned(),
            refresh: refresh.to_owned(),
            user,
            bare: false,
        };
    }

    /// Refresh answers with the token pair as the whole body, no envelope.
    pub(crate) fn refresh_succeeds_bare(&self, access: &str, refresh: &str) {
        *lock(&self.state.refresh_mode) = RefreshMode::Succeed {
            access: access.to_owned(),
            refresh: refresh.to_owned(),
            user: None,
            bare: true,
        };
    }

    pub(crate) fn refresh_fails(&self) {
        *lock(&self.state.refresh_mode) = RefreshMode::Fail;
    }

    /// Refresh never answers: the connection is dropped mid-request.
    pub(crate) fn refresh_disconnects(&self) {
        *lock(&self.state.refresh_mode) = RefreshMode::Disconnect;
    }

    /// Protected routes reject every token until the next refresh.
    pub(crate) fn expire_tokens(&self) {
        lock(&self.state.valid_token).clear();
    }

    pub(crate) fn set_refresh_delay(&self, delay: Duration) {
        *lock(&self.state.refresh_delay) = delay;
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<Recorded> {
        lock(&self.state.requests).clone()
    }

    /// Recorded requests for one route, in arrival order.
    pub(crate) fn requests_to(&self, method: &Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method.as_str() && r.path == path)
            .collect()
    }

    fn insert(&self, method: Method, path: &str, route: MockRoute) {
        lock(&self.state.routes).insert((method.to_string(), path.to_owned()), route);
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().strip_prefix(PREFIX).unwrap_or(uri.path()).to_owned();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    lock(&state.requests).push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_owned),
        authorization: authorization.clone(),
        body,
    });

    if method == Method::POST && path == "/auth/refresh" {
        return refresh(&state).await;
    }

    let route = lock(&state.routes).get(&(method.to_string(), path)).cloned();
    let Some(route) = route else {
        return (StatusCode::NOT_FOUND, Json(json!({ "success": false, "message": "Not found" })));
    };
    if route.protected {
        let expected = format!("Bearer {}", lock(&state.valid_token));
        if authorization.as_deref() != Some(expected.as_str()) {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "success": false, "message": "Token expired" })));
        }
    }
    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(route.body))
}

async fn refresh(state: &MockState) -> (StatusCode, Json<Value>) {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let delay = *lock(&state.refresh_delay);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mode = lock(&state.refresh_mode).clone();
    match mode {
        RefreshMode::Fail => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid refresh token" })),
        ),
        // Unwinding out of the handler makes hyper drop the connection.
        RefreshMode::Disconnect => panic!("mock api: dropping refresh connection"),
        RefreshMode::Succeed { access, refresh, user, bare } => {
            lock(&state.valid_token).clone_from(&access);
            let mut pair = json!({ "accessToken": access, "refreshToken": refresh });
            if let Some(user) = user {
                pair["user"] = user;
            }
            let body = if bare { pair } else { json!({ "success": true, "message": "Token refreshed", "data": pair }) };
            (StatusCode::OK, Json(body))
        }
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub(crate) fn test_user() -> User {
    User {
        id: "u-1".to_owned(),
        email: "ada@example.com".to_owned(),
        full_name: "Ada Lovelace".to_owned(),
        role: Role::Candidate,
        is_verified: true,
        avatar_url: None,
    }
}

pub(crate) fn user_json() -> Value {
    json!({
        "id": 1,
        "email": "ada@example.com",
        "fullName": "Ada Lovelace",
        "role": "candidate",
        "isVerified": true
    })
}

/// Session signed in as [`test_user`] with the given pair.
pub(crate) fn signed_in(access: &str, refresh: &str) -> (Arc<MemoryStore>, Arc<SessionStore>) {
    let storage = Arc::new(MemoryStore::new());
    let session = Arc::new(SessionStore::new(storage.clone()));
    session.set_auth(test_user(), access, refresh).expect("set auth");
    (storage, session)
}

pub(crate) fn signed_out() -> (Arc<MemoryStore>, Arc<SessionStore>) {
    let storage = Arc::new(MemoryStore::new());
    let session = Arc::new(SessionStore::new(storage.clone()));
    session.init_auth();
    (storage, session)
}

pub(crate) fn client_for(api: &MockApi, session: Arc<SessionStore>) -> ApiClient {
    ApiClient::with_http(reqwest::Client::new(), api.base_url(), session)
}
