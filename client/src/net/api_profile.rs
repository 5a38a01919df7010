//! The signed-in candidate's profile: personal info, experience,
//! education, skills and uploaded documents.

use super::{item_path, log_persist_failure, require_id, validated};
use crate::error::ApiError;
use crate::forms::{EducationForm, ExperienceForm, PersonalInfoForm, SkillForm};
use crate::net::http::{ApiClient, ApiRequest};
use crate::net::types::{Document, Education, Experience, Profile, Skill};

const PROFILE: &str = "/profile";
const EXPERIENCES: &str = "/profile/experiences";
const EDUCATIONS: &str = "/profile/educations";
const SKILLS: &str = "/profile/skills";
const DOCUMENTS: &str = "/profile/documents";

/// # Errors
///
/// Any [`ApiError`] from the call.
pub async fn get_profile(client: &ApiClient) -> Result<Profile, ApiError> {
    client.send(ApiRequest::get(PROFILE)).await
}

/// Save personal info and mirror the new name into the cached user.
///
/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn update_personal_info(client: &ApiClient, form: &PersonalInfoForm) -> Result<Profile, ApiError> {
    validated(form)?;
    let profile: Profile = client.send(ApiRequest::put(PROFILE).json(form)?).await?;

    let session = client.session();
    if let Some(mut user) = session.user() {
        if user.full_name != profile.full_name {
            user.full_name.clone_from(&profile.full_name);
            log_persist_failure(session.update_user(user), "profile name");
        }
    }
    Ok(profile)
}

// =============================================================================
// EXPERIENCE
// =============================================================================

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn add_experience(client: &ApiClient, form: &ExperienceForm) -> Result<Experience, ApiError> {
    validated(form)?;
    client.send(ApiRequest::post(EXPERIENCES).json(form)?).await
}

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn update_experience(client: &ApiClient, id: &str, form: &ExperienceForm) -> Result<Experience, ApiError> {
    require_id(id)?;
    validated(form)?;
    client
        .send(ApiRequest::put(item_path(EXPERIENCES, id)).json(form)?)
        .await
}

/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn delete_experience(client: &ApiClient, id: &str) -> Result<String, ApiError> {
    require_id(id)?;
    client
        .send_message(ApiRequest::delete(item_path(EXPERIENCES, id)))
        .await
}

// =============================================================================
// EDUCATION
// =============================================================================

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn add_education(client: &ApiClient, form: &EducationForm) -> Result<Education, ApiError> {
    validated(form)?;
    client.send(ApiRequest::post(EDUCATIONS).json(form)?).await
}

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn update_education(client: &ApiClient, id: &str, form: &EducationForm) -> Result<Education, ApiError> {
    require_id(id)?;
    validated(form)?;
    client
        .send(ApiRequest::put(item_path(EDUCATIONS, id)).json(form)?)
        .await
}

/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn delete_education(client: &ApiClient, id: &str) -> Result<String, ApiError> {
    require_id(id)?;
    client
        .send_message(ApiRequest::delete(item_path(EDUCATIONS, id)))
        .await
}

// =============================================================================
// SKILLS / DOCUMENTS
// =============================================================================

/// # Errors
///
/// `Validation` before sending; otherwise any [`ApiError`] from the call.
pub async fn add_skill(client: &ApiClient, form: &SkillForm) -> Result<Skill, ApiError> {
    validated(form)?;
    client.send(ApiRequest::post(SKILLS).json(form)?).await
}

/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn remove_skill(client: &ApiClient, id: &str) -> Result<String, ApiError> {
    require_id(id)?;
    client
        .send_message(ApiRequest::delete(item_path(SKILLS, id)))
        .await
}

/// # Errors
///
/// Any [`ApiError`] from the call.
pub async fn list_documents(client: &ApiClient) -> Result<Vec<Document>, ApiError> {
    client.send(ApiRequest::get(DOCUMENTS)).await
}

/// # Errors
///
/// `Validation` for a blank id; otherwise any [`ApiError`] from the call.
pub async fn delete_document(client: &ApiClient, id: &str) -> Result<String, ApiError> {
    require_id(id)?;
    client
        .send_message(ApiRequest::delete(item_path(DOCUMENTS, id)))
        .await
}
