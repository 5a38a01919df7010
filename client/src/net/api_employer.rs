//! Employer workspace: postings and the applicants to them.

use super::{action_path, item_path, require_id, validated};
use crate::error::ApiError;
use crate::forms::{ApplicationStatusUpdate, JobPostingForm};
use crate::net::http::{ApiClient, ApiRequest};
use crate::net::types::{Application, EmployerDashboard, JobPosting, ListQuery, Page};

const JOBS: &str = "/employer/jobs";

/// # Errors
///
/// Any [`ApiError`] from the call.
pub async fn dashboard(client: &ApiClient) -> Result<EmployerDashboard, ApiError> {
    client.send(ApiRequest::get("/employer/dashboard")).await
}

/// # Errors
///
/// Any [`ApiError`] from the call.
pub async fn my_jobs(client: &ApiClient, query: &ListQuery) -> Result<Page<JobPosting>, ApiError> {
    client.send(ApiRequest::get(JOBS).query(query.to_query())).await
}

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn create_job(client: &ApiClient, form: &JobPostingForm) -> Result<JobPosting, ApiError> {
    validated(form)?;
    let job: JobPosting = client.send(ApiRequest::post(JOBS).json(form)?).await?;
    tracing::info!(job_id = %job.id, "job posted");
    Ok(job)
}

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn update_job(client: &ApiClient, id: &str, form: &JobPostingForm) -> Result<JobPosting, ApiError> {
    require_id(id)?;
    validated(form)?;
    client.send(ApiRequest::put(item_path(JOBS, id)).json(form)?).await
}

/// Stop accepting applications for a posting.
///
/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn close_job(client: &ApiClient, id: &str) -> Result<JobPosting, ApiError> {
    require_id(id)?;
    client.send(ApiRequest::put(action_path(JOBS, id, "close"))).await
}

/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn job_applicants(client: &ApiClient, job_id: &str) -> Result<Vec<Application>, ApiError> {
    require_id(job_id)?;
    client
        .send(ApiRequest::get(action_path(JOBS, job_id, "applications")))
        .await
}

/// Move an application through the hiring pipeline.
///
/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn update_application_status(
    client: &ApiClient,
    application_id: &str,
    update: &ApplicationStatusUpdate,
) -> Result<Application, ApiError> {
    require_id(application_id)?;
    validated(update)?;
    let request = ApiRequest::put(action_path("/employer/applications", application_id, "status")).json(update)?;
    client.send(request).await
}
