//! Request payloads for the platform's forms, with their validation rules.
//!
//! Each form serializes to the camelCase body its endpoint expects.
//! Client-only fields such as password confirmations are validated but
//! never sent.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use serde::Serialize;

use crate::net::types::{ApplicationStatus, Role};
use crate::util::validation::{
    FieldErrors, Validate, date, date_order, email, matches, max_len, password, phone, required,
};

pub const COVER_LETTER_MAX_CHARS: usize = 5000;
pub const BIO_MAX_CHARS: usize = 1000;

fn blank(value: Option<&String>) -> &str {
    value.map_or("", String::as_str)
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("email", &[required(&self.email), email(&self.email)]);
        errors.check("password", &[required(&self.password)]);
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
    pub role: Role,
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("fullName", &[required(&self.full_name)]);
        errors.check("email", &[required(&self.email), email(&self.email)]);
        errors.check("password", &[required(&self.password), password(&self.password)]);
        errors.check(
            "confirmPassword",
            &[required(&self.confirm_password), matches(&self.confirm_password, &self.password)],
        );
        if self.role == Role::Admin {
            errors.add("role", "Choose candidate or employer");
        }
        errors.into_result()
    }
}

/// Body of forgot-password and resend-verification.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EmailForm {
    pub email: String,
}

impl Validate for EmailForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("email", &[required(&self.email), email(&self.email)]);
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl Validate for ResetPasswordForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("token", &[required(&self.token)]);
        errors.check("password", &[required(&self.password), password(&self.password)]);
        errors.check(
            "confirmPassword",
            &[required(&self.confirm_password), matches(&self.confirm_password, &self.password)],
        );
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct VerifyEmailForm {
    pub token: String,
}

impl Validate for VerifyEmailForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("token", &[required(&self.token)]);
        errors.into_result()
    }
}

// =============================================================================
// PROFILE
// =============================================================================

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoForm {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Validate for PersonalInfoForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("fullName", &[required(&self.full_name)]);
        errors.check("phone", &[phone(blank(self.phone.as_ref()))]);
        errors.check(
            "bio",
            &[max_len(blank(self.bio.as_ref()), BIO_MAX_CHARS, "Bio must be at most 1000 characters")],
        );
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceForm {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub is_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for ExperienceForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let end = blank(self.end_date.as_ref());
        errors.check("title", &[required(&self.title)]);
        errors.check("company", &[required(&self.company)]);
        errors.check("startDate", &[required(&self.start_date), date(&self.start_date)]);
        if !self.is_current {
            errors.check(
                "endDate",
                &[required(end), date(end), date_order(&self.start_date, end)],
            );
        }
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationForm {
    pub institution: String,
    pub degree: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

impl Validate for EducationForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let end = blank(self.end_date.as_ref());
        errors.check("institution", &[required(&self.institution)]);
        errors.check("degree", &[required(&self.degree)]);
        errors.check("startDate", &[required(&self.start_date), date(&self.start_date)]);
        errors.check("endDate", &[date(end), date_order(&self.start_date, end)]);
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SkillForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Validate for SkillForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", &[required(&self.name), max_len(&self.name, 50, "Skill name is too long")]);
        errors.into_result()
    }
}

// =============================================================================
// APPLICATIONS
// =============================================================================

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationForm {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_document_id: Option<String>,
}

impl Validate for JobApplicationForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("jobId", &[required(&self.job_id)]);
        errors.check(
            "coverLetter",
            &[max_len(
                blank(self.cover_letter.as_ref()),
                COVER_LETTER_MAX_CHARS,
                "Cover letter must be at most 5000 characters",
            )],
        );
        errors.into_result()
    }
}

// =============================================================================
// EMPLOYER / ADMIN
// =============================================================================

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingForm {
    pub title: String,
    pub location: String,
    pub employment_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl Validate for JobPostingForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("title", &[required(&self.title)]);
        errors.check("location", &[required(&self.location)]);
        errors.check("employmentType", &[required(&self.employment_type)]);
        errors.check("description", &[required(&self.description)]);
        errors.check("deadline", &[date(blank(self.deadline.as_ref()))]);

        for (field, value) in [("salaryMin", self.salary_min), ("salaryMax", self.salary_max)] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                errors.add(field, "Salary must be a positive number");
            }
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if max < min {
                errors.add("salaryMax", "Maximum salary must not be below the minimum");
            }
        }
        errors.into_result()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ApplicationStatusUpdate {
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Validate for ApplicationStatusUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        // Withdrawal belongs to the applicant.
        if self.status == ApplicationStatus::Withdrawn {
            errors.add("status", "Employers cannot withdraw an application");
        }
        errors.check("note", &[max_len(blank(self.note.as_ref()), 1000, "Note must be at most 1000 characters")]);
        errors.into_result()
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusUpdate {
    pub is_active: bool,
}
