//! Platform administration.

use super::{action_path, require_id};
use crate::error::ApiError;
use crate::forms::UserStatusUpdate;
use crate::net::http::{ApiClient, ApiRequest};
use crate::net::types::{AdminDashboard, AdminUser, ListQuery, Page};

/// # Errors
///
/// Any [`ApiError`] from the call.
pub async fn dashboard(client: &ApiClient) -> Result<AdminDashboard, ApiError> {
    client.send(ApiRequest::get("/admin/dashboard")).await
}

/// # Errors
///
/// Any [`ApiError`] from the call.
pub async fn list_users(client: &ApiClient, query: &ListQuery) -> Result<Page<AdminUser>, ApiError> {
    client
        .send(ApiRequest::get("/admin/users").query(query.to_query()))
        .await
}

/// Activate or deactivate an account.
///
/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn set_user_active(client: &ApiClient, user_id: &str, is_active: bool) -> Result<AdminUser, ApiError> {
    require_id(user_id)?;
    let request = ApiRequest::put(action_path("/admin/users", user_id, "status")).json(&UserStatusUpdate { is_active })?;
    let user: AdminUser = client.send(request).await?;
    tracing::info!(user_id = %user.user.id, is_active = user.is_active, "user status changed");
    Ok(user)
}
