//! A candidate's job applications.

use super::{action_path, item_path, require_id, validated};
use crate::error::ApiError;
use crate::forms::JobApplicationForm;
use crate::net::http::{ApiClient, ApiRequest};
use crate::net::types::Application;

const APPLICATIONS: &str = "/applications";

/// Submit an application for a job.
///
/// # Errors
///
/// `Validation` before sending (missing job, cover letter over the cap);
/// otherwise any [`ApiError`] from the call.
pub async fn apply(client: &ApiClient, form: &JobApplicationForm) -> Result<Application, ApiError> {
    validated(form)?;
    let application: Application = client.send(ApiRequest::post(APPLICATIONS).json(form)?).await?;
    tracing::info!(application_id = %application.id, job_id = %application.job_id, "application submitted");
    Ok(application)
}

/// # Errors
///
/// Any [`ApiError`] from the call.
pub async fn my_applications(client: &ApiClient) -> Result<Vec<Application>, ApiError> {
    client.send(ApiRequest::get("/applications/my")).await
}

/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn get_application(client: &ApiClient, id: &str) -> Result<Application, ApiError> {
    require_id(id)?;
    client.send(ApiRequest::get(item_path(APPLICATIONS, id))).await
}

/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn withdraw_application(client: &ApiClient, id: &str) -> Result<Application, ApiError> {
    require_id(id)?;
    client
        .send(ApiRequest::put(action_path(APPLICATIONS, id, "withdraw")))
        .await
}
