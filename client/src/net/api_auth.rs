//! Sign-in, registration and account recovery.
//!
//! Credential-exchange calls are public requests: a 401 from them means bad
//! credentials, not an expired session, so they never trigger a refresh.

use super::{log_persist_failure, validated};
use crate::error::ApiError;
use crate::forms::{EmailForm, LoginForm, RegisterForm, ResetPasswordForm, VerifyEmailForm};
use crate::net::http::{ApiClient, ApiRequest};
use crate::net::types::{AuthPayload, User};

/// Exchange credentials for a token pair and sign the session in.
///
/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn login(client: &ApiClient, form: &LoginForm) -> Result<User, ApiError> {
    validated(form)?;
    let request = ApiRequest::post("/auth/login").json(form)?.public();
    let payload: AuthPayload = client.send(request).await?;
    tracing::info!(user_id = %payload.user.id, role = ?payload.user.role, "signed in");
    log_persist_failure(
        client
            .session()
            .set_auth(payload.user.clone(), &payload.access_token, &payload.refresh_token),
        "sign-in",
    );
    Ok(payload.user)
}

/// Create an account. Returns the server's confirmation message; the
/// session stays signed out until the email is verified and the user logs in.
///
/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn register(client: &ApiClient, form: &RegisterForm) -> Result<String, ApiError> {
    validated(form)?;
    client
        .send_message(ApiRequest::post("/auth/register").json(form)?.public())
        .await
}

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn forgot_password(client: &ApiClient, form: &EmailForm) -> Result<String, ApiError> {
    validated(form)?;
    client
        .send_message(ApiRequest::post("/auth/forgot-password").json(form)?.public())
        .await
}

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn reset_password(client: &ApiClient, form: &ResetPasswordForm) -> Result<String, ApiError> {
    validated(form)?;
    client
        .send_message(ApiRequest::post("/auth/reset-password").json(form)?.public())
        .await
}

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn verify_email(client: &ApiClient, form: &VerifyEmailForm) -> Result<String, ApiError> {
    validated(form)?;
    client
        .send_message(ApiRequest::post("/auth/verify-email").json(form)?.public())
        .await
}

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn resend_verification(client: &ApiClient, form: &EmailForm) -> Result<String, ApiError> {
    validated(form)?;
    client
        .send_message(ApiRequest::post("/auth/resend-verification").json(form)?.public())
        .await
}

/// Fetch the signed-in user and refresh the cached copy.
///
/// # Errors
///
/// Any [`ApiError`] from the call, including `SessionExpired`.
pub async fn current_user(client: &ApiClient) -> Result<User, ApiError> {
    let user: User = client.send(ApiRequest::get("/auth/me")).await?;
    log_persist_failure(client.session().update_user(user.clone()), "current user");
    Ok(user)
}

/// Sign out locally. Tokens are stateless on the server, so nothing is sent.
pub fn logout(client: &ApiClient) {
    client.session().logout();
    tracing::info!("signed out");
}
