//! Wire DTOs for the recruitment platform REST API.
//!
//! DESIGN
//! ======
//! Every response arrives in the same envelope
//! (`{ success, message, data?, error?, code?, reason? }`). Records are plain
//! data-transfer shapes: camelCase on the wire, lenient defaults for fields
//! older API versions omit, and identifiers normalized to strings because
//! the API emits both numeric and string ids.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// ENVELOPE
// =============================================================================

/// Uniform response wrapper.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Paginated list payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Candidate,
    Employer,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// `data` of a successful login.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// `data` of a successful refresh. The user is optional; the cached one is
/// kept when absent.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub job_count: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    #[default]
    Open,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub company: Option<CompanySummary>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Query parameters for `GET /jobs`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobFilters {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub company_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl JobFilters {
    /// Non-empty filters as query pairs, in a stable order.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_text(&mut query, "keyword", self.keyword.as_deref());
        push_text(&mut query, "location", self.location.as_deref());
        push_text(&mut query, "employmentType", self.employment_type.as_deref());
        push_text(&mut query, "companyId", self.company_id.as_deref());
        push_paging(&mut query, self.page, self.limit);
        query
    }
}

/// Query parameters for `GET /companies` and other keyword/paged lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub keyword: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_text(&mut query, "keyword", self.keyword.as_deref());
        push_paging(&mut query, self.page, self.limit);
        query
    }
}

fn push_text(query: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        query.push((key.to_owned(), value.to_owned()));
    }
}

fn push_paging(query: &mut Vec<(String, String)>, page: Option<u32>, limit: Option<u32>) {
    if let Some(page) = page {
        query.push(("page".to_owned(), page.to_string()));
    }
    if let Some(limit) = limit {
        query.push(("limit".to_owned(), limit.to_string()));
    }
}

// =============================================================================
// APPLICATIONS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewing,
    Shortlisted,
    Interview,
    Offered,
    Hired,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// Applicants may withdraw until a final decision is made.
    #[must_use]
    pub fn can_withdraw(self) -> bool {
        !matches!(self, Self::Hired | Self::Rejected | Self::Withdrawn)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub job_id: String,
    #[serde(default)]
    pub job: Option<JobPosting>,
    #[serde(default)]
    pub applicant: Option<User>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub resume_document_id: Option<String>,
    #[serde(default)]
    pub applied_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

// =============================================================================
// PROFILE
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub educations: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

// =============================================================================
// DASHBOARDS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployerDashboard {
    pub total_jobs: u64,
    pub open_jobs: u64,
    pub total_applications: u64,
    pub pending_applications: u64,
    pub recent_applications: Vec<Application>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminDashboard {
    pub total_users: u64,
    pub total_candidates: u64,
    pub total_employers: u64,
    pub total_companies: u64,
    pub total_jobs: u64,
    pub total_applications: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(flatten)]
    pub user: User,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// ID NORMALIZATION
// =============================================================================

fn id_from_value<E: serde::de::Error>(value: serde_json::Value) -> Result<String, E> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(E::custom(format!("expected string or number id, got {other}"))),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value)
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        value => id_from_value(value).map(Some),
    }
}
