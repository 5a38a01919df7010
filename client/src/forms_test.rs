use serde_json::json;

use super::*;

fn register() -> RegisterForm {
    RegisterForm {
        full_name: "Ana Lima".to_owned(),
        email: "ana@example.com".to_owned(),
        password: "hunter22x".to_owned(),
        confirm_password: "hunter22x".to_owned(),
        role: Role::Candidate,
    }
}

#[test]
fn login_requires_email_and_password() {
    let errors = LoginForm::default().validate().unwrap_err();
    assert_eq!(errors.get("email"), Some("This field is required"));
    assert_eq!(errors.get("password"), Some("This field is required"));

    let form = LoginForm { email: "not-an-email".to_owned(), password: "x".to_owned() };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.get("email"), Some("Enter a valid email address"));
    assert_eq!(errors.get("password"), None);
}

#[test]
fn register_accepts_valid_form_and_omits_confirmation() {
    let form = register();
    assert!(form.validate().is_ok());
    let body = serde_json::to_value(&form).unwrap();
    assert_eq!(
        body,
        json!({ "fullName": "Ana Lima", "email": "ana@example.com", "password": "hunter22x", "role": "candidate" })
    );
}

#[test]
fn register_checks_password_strength_and_confirmation() {
    let form = RegisterForm { password: "short1".to_owned(), confirm_password: "short2".to_owned(), ..register() };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
    assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));

    let form = RegisterForm { password: "lettersonly".to_owned(), confirm_password: "lettersonly".to_owned(), ..register() };
    assert_eq!(form.validate().unwrap_err().get("password"), Some("Password must contain a letter and a number"));
}

#[test]
fn register_rejects_admin_role() {
    let form = RegisterForm { role: Role::Admin, ..register() };
    assert!(form.validate().unwrap_err().get("role").is_some());
}

#[test]
fn reset_password_requires_token() {
    let form = ResetPasswordForm { token: " ".to_owned(), password: "abcdefg1".to_owned(), confirm_password: "abcdefg1".to_owned() };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("token"), Some("This field is required"));
}

#[test]
fn experience_end_date_rules_depend_on_is_current() {
    let current = ExperienceForm {
        title: "Engineer".to_owned(),
        company: "Acme".to_owned(),
        start_date: "2022-03-01".to_owned(),
        is_current: true,
        ..ExperienceForm::default()
    };
    assert!(current.validate().is_ok());

    let ended = ExperienceForm { is_current: false, ..current.clone() };
    assert_eq!(ended.validate().unwrap_err().get("endDate"), Some("This field is required"));

    let backwards = ExperienceForm { end_date: Some("2021-12-31".to_owned()), ..ended.clone() };
    assert_eq!(backwards.validate().unwrap_err().get("endDate"), Some("End date cannot be before start date"));

    let malformed = ExperienceForm { end_date: Some("31/12/2023".to_owned()), ..ended };
    assert_eq!(malformed.validate().unwrap_err().get("endDate"), Some("Use the YYYY-MM-DD date format"));
}

#[test]
fn education_end_date_is_optional() {
    let form = EducationForm {
        institution: "MIT".to_owned(),
        degree: "BSc".to_owned(),
        start_date: "2015-09-01".to_owned(),
        ..EducationForm::default()
    };
    assert!(form.validate().is_ok());
    let body = serde_json::to_value(&form).unwrap();
    assert_eq!(body, json!({ "institution": "MIT", "degree": "BSc", "startDate": "2015-09-01" }));
}

#[test]
fn personal_info_checks_phone() {
    let form = PersonalInfoForm {
        full_name: "Ana".to_owned(),
        phone: Some("call me".to_owned()),
        ..PersonalInfoForm::default()
    };
    assert_eq!(form.validate().unwrap_err().get("phone"), Some("Enter a valid phone number"));

    let form = PersonalInfoForm { phone: Some("+1 (555) 123-4567".to_owned()), ..form };
    assert!(form.validate().is_ok());
}

#[test]
fn cover_letter_is_capped_at_5000_characters() {
    let mut form = JobApplicationForm { job_id: "7".to_owned(), cover_letter: Some("é".repeat(5000)), resume_document_id: None };
    assert!(form.validate().is_ok());

    form.cover_letter = Some("a".repeat(5001));
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.get("coverLetter"), Some("Cover letter must be at most 5000 characters"));
}

#[test]
fn job_posting_salary_range_must_be_ordered() {
    let form = JobPostingForm {
        title: "Rust Engineer".to_owned(),
        location: "Remote".to_owned(),
        employment_type: "full_time".to_owned(),
        description: "Build things".to_owned(),
        salary_min: Some(120_000.0),
        salary_max: Some(90_000.0),
        ..JobPostingForm::default()
    };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("salaryMax"), Some("Maximum salary must not be below the minimum"));

    let form = JobPostingForm { salary_min: Some(-1.0), salary_max: None, ..form };
    assert_eq!(form.validate().unwrap_err().get("salaryMin"), Some("Salary must be a positive number"));
}

#[test]
fn employer_cannot_set_withdrawn_status() {
    let update = ApplicationStatusUpdate { status: ApplicationStatus::Withdrawn, note: None };
    assert!(update.validate().is_err());

    let update = ApplicationStatusUpdate { status: ApplicationStatus::Shortlisted, note: None };
    assert!(update.validate().is_ok());
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "status": "shortlisted" }));
}
