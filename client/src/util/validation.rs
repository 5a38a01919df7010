//! Field-level validation primitives shared by the form schemas.
//!
//! DESIGN
//! ======
//! Each rule returns `Option<&'static str>` (the message) so schemas can
//! chain checks per field and keep only the first failure, which is what an
//! inline field error shows.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use time::Date;
use time::macros::format_description;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Ordered map of field name to its first validation message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_insert_with(|| message.into());
    }

    /// Record the first failing rule for `field`, if any.
    pub fn check(&mut self, field: &str, rules: &[Option<&'static str>]) {
        if let Some(message) = rules.iter().flatten().next() {
            self.add(field, *message);
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message of the first field in name order.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// A request payload that can be checked before it is sent.
pub trait Validate {
    /// # Errors
    ///
    /// Returns every failing field with its first message.
    fn validate(&self) -> Result<(), FieldErrors>;
}

// =============================================================================
// RULES
// =============================================================================

#[must_use]
pub fn required(value: &str) -> Option<&'static str> {
    value.trim().is_empty().then_some("This field is required")
}

#[must_use]
pub fn max_len(value: &str, max: usize, message: &'static str) -> Option<&'static str> {
    (value.chars().count() > max).then_some(message)
}

#[must_use]
pub fn email(value: &str) -> Option<&'static str> {
    const MESSAGE: &str = "Enter a valid email address";
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return Some(MESSAGE);
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
        && !domain.contains("..");
    if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace) {
        return Some(MESSAGE);
    }
    None
}

#[must_use]
pub fn password(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return None;
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 8 characters");
    }
    let has_letter = value.chars().any(char::is_alphabetic);
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        return Some("Password must contain a letter and a number");
    }
    None
}

#[must_use]
pub fn matches(value: &str, other: &str) -> Option<&'static str> {
    (value != other).then_some("Passwords do not match")
}

#[must_use]
pub fn phone(value: &str) -> Option<&'static str> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (!allowed || !(7..=15).contains(&digits)).then_some("Enter a valid phone number")
}

/// Parse a `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

#[must_use]
pub fn date(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        return None;
    }
    parse_date(value).is_none().then_some("Use the YYYY-MM-DD date format")
}

/// `end` must not precede `start`; unparseable dates are left to [`date`].
#[must_use]
pub fn date_order(start: &str, end: &str) -> Option<&'static str> {
    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) if end < start => Some("End date cannot be before start date"),
        _ => None,
    }
}
