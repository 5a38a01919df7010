//! Public job and company catalog.

use super::{item_path, require_id};
use crate::error::ApiError;
use crate::net::http::{ApiClient, ApiRequest};
use crate::net::types::{Company, JobFilters, JobPosting, ListQuery, Page};

/// # Errors
///
/// Any [`ApiError`] from the call.
pub async fn list_jobs(client: &ApiClient, filters: &JobFilters) -> Result<Page<JobPosting>, ApiError> {
    client
        .send(ApiRequest::get("/jobs").query(filters.to_query()))
        .await
}

/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn get_job(client: &ApiClient, id: &str) -> Result<JobPosting, ApiError> {
    require_id(id)?;
    client.send(ApiRequest::get(item_path("/jobs", id))).await
}

/// # Errors
///
/// Any [`ApiError`] from the call.
pub async fn list_companies(client: &ApiClient, query: &ListQuery) -> Result<Page<Company>, ApiError> {
    client
        .send(ApiRequest::get("/companies").query(query.to_query()))
        .await
}

/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn get_company(client: &ApiClient, id: &str) -> Result<Company, ApiError> {
    require_id(id)?;
    client.send(ApiRequest::get(item_path("/companies", id))).await
}
