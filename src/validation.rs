//! Field validators for the contact form.
//!
//! Failures are returned as data so the form can show every message at once.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 1000;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Outcome of validating one field. `error` is set iff `is_valid` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_error(self) -> Option<String> {
        self.error
    }
}

pub fn validate_name(value: &str) -> ValidationResult {
    check_length("Name", value, NAME_MIN, NAME_MAX)
}

pub fn validate_email(value: &str) -> ValidationResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ValidationResult::fail("Email is required");
    }
    if !EMAIL_PATTERN.is_match(trimmed) {
        return ValidationResult::fail("Please enter a valid email address");
    }
    ValidationResult::ok()
}

pub fn validate_message(value: &str) -> ValidationResult {
    check_length("Message", value, MESSAGE_MIN, MESSAGE_MAX)
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ValidationResult::fail(format!("{field} is required"));
    }
    let len = trimmed.chars().count();
    if len < min {
        return ValidationResult::fail(format!("{field} must be at least {min} characters"));
    }
    if len > max {
        return ValidationResult::fail(format!("{field} must be less than {max} characters"));
    }
    ValidationResult::ok()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactFormErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactFormValidation {
    pub is_valid: bool,
    pub errors: ContactFormErrors,
}

/// Runs every field validator; one bad field never hides another's error.
pub fn validate_contact_form(name: &str, email: &str, message: &str) -> ContactFormValidation {
    let name = validate_name(name);
    let email = validate_email(email);
    let message = validate_message(message);

    ContactFormValidation {
        is_valid: name.is_valid() && email.is_valid() && message.is_valid(),
        errors: ContactFormErrors {
            name: name.into_error(),
            email: email.into_error(),
            message: message.into_error(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exclusive(result: &ValidationResult) {
        assert_eq!(result.is_valid(), result.error().is_none());
    }

    #[test]
    fn name_length_boundaries() {
        assert_eq!(validate_name("   ").error(), Some("Name is required"));
        assert_eq!(
            validate_name(" A ").error(),
            Some("Name must be at least 2 characters")
        );
        assert!(validate_name("Al").is_valid());
        assert!(validate_name(&"x".repeat(100)).is_valid());
        assert_eq!(
            validate_name(&"x".repeat(101)).error(),
            Some("Name must be less than 100 characters")
        );
    }

    #[test]
    fn name_length_counts_characters_after_trim() {
        assert!(validate_name("  Zoë  ").is_valid());
        assert!(validate_name(&format!("  {}  ", "é".repeat(100))).is_valid());
    }

    #[test]
    fn every_length_in_range_is_valid() {
        for len in 0..=120 {
            let result = validate_name(&"n".repeat(len));
            assert_exclusive(&result);
            assert_eq!(result.is_valid(), (NAME_MIN..=NAME_MAX).contains(&len), "len {len}");
        }
    }

    #[test]
    fn email_shapes() {
        assert_eq!(validate_email(" ").error(), Some("Email is required"));
        assert!(validate_email("a@b.com").is_valid());
        assert!(validate_email("  first.last+tag@mail.example.org ").is_valid());

        for bad in ["bad", "a.b.com", "a@@b.com", "a@b@c.com", "a@bcom", "a b@c.com", "@b.com"] {
            assert_eq!(
                validate_email(bad).error(),
                Some("Please enter a valid email address"),
                "{bad}"
            );
        }
    }

    #[test]
    fn message_length_boundaries() {
        assert_eq!(validate_message("").error(), Some("Message is required"));
        assert!(!validate_message(&"m".repeat(9)).is_valid());
        assert!(validate_message(&"m".repeat(10)).is_valid());
        assert!(validate_message(&"m".repeat(1000)).is_valid());
        assert_eq!(
            validate_message(&"m".repeat(1001)).error(),
            Some("Message must be less than 1000 characters")
        );
        assert!(!validate_message(&format!("   {}   ", "m".repeat(9))).is_valid());
    }

    #[test]
    fn form_collects_all_errors() {
        let ok = validate_contact_form("Al", "a@b.com", "1234567890");
        assert!(ok.is_valid);
        assert_eq!(ok.errors, ContactFormErrors::default());

        let bad = validate_contact_form("", "bad", "short");
        assert!(!bad.is_valid);
        assert!(bad.errors.name.is_some());
        assert!(bad.errors.email.is_some());
        assert!(bad.errors.message.is_some());
    }

    #[test]
    fn one_bad_field_invalidates_form() {
        let result = validate_contact_form("Grace", "grace@navy.mil", "hi");
        assert!(!result.is_valid);
        assert!(result.errors.name.is_none());
        assert!(result.errors.email.is_none());
        assert_eq!(
            result.errors.message.as_deref(),
            Some("Message must be at least 10 characters")
        );
    }
}
