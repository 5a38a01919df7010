use super::*;

#[test]
fn required_rejects_blank_and_whitespace() {
    assert!(required("").is_some());
    assert!(required("   ").is_some());
    assert!(required("x").is_none());
}

#[test]
fn email_accepts_common_addresses() {
    assert!(email("ana@example.com").is_none());
    assert!(email("first.last+jobs@mail.example.org").is_none());
}

#[test]
fn email_rejects_malformed_addresses() {
    for bad in ["ana", "ana@", "@example.com", "ana@example", "ana@.com", "ana@example.", "a b@example.com", "a@b@c.com"] {
        assert!(email(bad).is_some(), "expected rejection for {bad:?}");
    }
}

#[test]
fn email_leaves_empty_to_required() {
    assert!(email("").is_none());
}

#[test]
fn password_requires_length_letter_and_digit() {
    assert_eq!(password("short1"), Some("Password must be at least 8 characters"));
    assert_eq!(password("longenough"), Some("Password must contain a letter and a number"));
    assert_eq!(password("12345678"), Some("Password must contain a letter and a number"));
    assert!(password("secret123").is_none());
}

#[test]
fn phone_accepts_formatted_numbers() {
    assert!(phone("+1 (555) 123-4567").is_none());
    assert!(phone("0912345678").is_none());
    assert!(phone("").is_none());
}

#[test]
fn phone_rejects_letters_and_short_numbers() {
    assert!(phone("555-CALL").is_some());
    assert!(phone("12345").is_some());
}

#[test]
fn date_rules_parse_iso_dates() {
    assert!(date("2024-02-29").is_none());
    assert!(date("2023-02-29").is_some());
    assert!(date("03/04/2024").is_some());
    assert!(date_order("2024-01-01", "2023-12-31").is_some());
    assert!(date_order("2024-01-01", "2024-01-01").is_none());
    assert!(date_order("bad", "2024-01-01").is_none());
}

#[test]
fn field_errors_keep_first_message_per_field() {
    let mut errors = FieldErrors::new();
    errors.check("email", &[required(""), email("")]);
    errors.add("email", "ignored");
    errors.check("password", &[None, password("short1")]);
    errors.check("name", &[required("Ana")]);

    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("email"), Some("This field is required"));
    assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
    assert_eq!(errors.get("name"), None);
    assert_eq!(errors.first_message(), Some("This field is required"));
}

#[test]
fn field_errors_display_and_result() {
    let mut errors = FieldErrors::new();
    assert!(errors.clone().into_result().is_ok());
    errors.add("b", "second");
    errors.add("a", "first");
    assert_eq!(errors.to_string(), "a: first; b: second");
    assert_eq!(errors.into_result().unwrap_err().len(), 2);
}
