use super::*;
use serde_json::json;

#[test]
fn envelope_parses_success_with_data() {
    let raw = json!({
        "success": true,
        "message": "ok",
        "data": { "id": 7, "email": "ana@example.com", "fullName": "Ana", "role": "employer", "isVerified": true }
    });
    let env: ApiEnvelope<User> = serde_json::from_value(raw).unwrap();
    assert!(env.success);
    let user = env.data.unwrap();
    assert_eq!(user.id, "7");
    assert_eq!(user.full_name, "Ana");
    assert!(user.has_role(Role::Employer));
    assert!(user.is_verified);
}

#[test]
fn envelope_parses_failure_without_data() {
    let raw = json!({
        "success": false,
        "message": "Email already registered",
        "code": "EMAIL_TAKEN",
        "reason": "duplicate",
        "error": { "field": "email" }
    });
    let env: ApiEnvelope<User> = serde_json::from_value(raw).unwrap();
    assert!(!env.success);
    assert!(env.data.is_none());
    assert_eq!(env.code.as_deref(), Some("EMAIL_TAKEN"));
    assert_eq!(env.reason.as_deref(), Some("duplicate"));
    assert_eq!(env.error, Some(json!({ "field": "email" })));
}

#[test]
fn user_defaults_missing_optional_fields() {
    let user: User = serde_json::from_value(json!({ "id": "u1", "email": "a@b.co" })).unwrap();
    assert_eq!(user.role, Role::Candidate);
    assert!(!user.is_verified);
    assert!(user.avatar_url.is_none());
}

#[test]
fn user_rejects_non_scalar_id() {
    let err = serde_json::from_value::<User>(json!({ "id": [1], "email": "a@b.co" })).unwrap_err();
    assert!(err.to_string().contains("expected string or number id"));
}

#[test]
fn user_serializes_camel_case_for_storage() {
    let user = User {
        id: "u1".to_owned(),
        email: "a@b.co".to_owned(),
        full_name: "Ana".to_owned(),
        role: Role::Admin,
        is_verified: true,
        avatar_url: None,
    };
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value, json!({ "id": "u1", "email": "a@b.co", "fullName": "Ana", "role": "admin", "isVerified": true }));
}

#[test]
fn token_pair_user_is_optional() {
    let pair: TokenPair = serde_json::from_value(json!({ "accessToken": "A2", "refreshToken": "R2" })).unwrap();
    assert_eq!(pair.access_token, "A2");
    assert!(pair.user.is_none());
}

#[test]
fn job_posting_normalizes_ids_and_defaults() {
    let job: JobPosting = serde_json::from_value(json!({
        "id": 12,
        "title": "Rust Engineer",
        "companyId": 3,
        "company": { "id": 3, "name": "Acme" },
        "salaryMin": 90000.0,
        "skills": ["rust", "tokio"]
    }))
    .unwrap();
    assert_eq!(job.id, "12");
    assert_eq!(job.company_id.as_deref(), Some("3"));
    assert_eq!(job.company.unwrap().name, "Acme");
    assert_eq!(job.status, JobStatus::Open);
    assert_eq!(job.skills, vec!["rust", "tokio"]);
    assert!(job.salary_max.is_none());
}

#[test]
fn job_posting_null_company_id_is_none() {
    let job: JobPosting = serde_json::from_value(json!({ "id": "j1", "title": "T", "companyId": null })).unwrap();
    assert!(job.company_id.is_none());
}

#[test]
fn application_status_parses_snake_case() {
    let app: Application =
        serde_json::from_value(json!({ "id": 1, "jobId": 2, "status": "shortlisted" })).unwrap();
    assert_eq!(app.status, ApplicationStatus::Shortlisted);
    assert!(app.status.can_withdraw());
    assert!(!ApplicationStatus::Withdrawn.can_withdraw());
    assert!(!ApplicationStatus::Hired.can_withdraw());
}

#[test]
fn page_defaults_when_fields_missing() {
    let page: Page<Company> = serde_json::from_value(json!({ "items": [{ "id": 1, "name": "Acme" }] })).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.page, 1);
    assert_eq!(page.total, 0);
}

#[test]
fn job_filters_skip_blank_values() {
    let filters = JobFilters {
        keyword: Some(" rust ".to_owned()),
        location: Some("   ".to_owned()),
        employment_type: Some("full_time".to_owned()),
        company_id: None,
        page: Some(2),
        limit: Some(20),
    };
    let query = filters.to_query();
    let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(
        pairs,
        vec![("keyword", "rust"), ("employmentType", "full_time"), ("page", "2"), ("limit", "20")]
    );
    assert!(ListQuery::default().to_query().is_empty());
}

#[test]
fn admin_user_flattens_user_fields() {
    let admin: AdminUser = serde_json::from_value(json!({
        "id": 5, "email": "e@x.io", "role": "employer", "isActive": false
    }))
    .unwrap();
    assert_eq!(admin.user.id, "5");
    assert_eq!(admin.user.role, Role::Employer);
    assert!(!admin.is_active);
}

#[test]
fn dashboards_default_missing_counters() {
    let stats: EmployerDashboard = serde_json::from_value(json!({ "openJobs": 4 })).unwrap();
    assert_eq!(stats.open_jobs, 4);
    assert_eq!(stats.total_jobs, 0);
    assert!(stats.recent_applications.is_empty());
}
