//! Validation utilities.

use crate::{UserId, UserdirError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `UserdirError` on failure.
    fn validate_request(&self) -> Result<(), UserdirError> {
        self.validate().map_err(validation_errors_to_userdir_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `UserdirError`.
///
/// Only the first offending field is reported. Fields are visited in name
/// order so the choice is stable across runs.
#[must_use]
pub fn validation_errors_to_userdir_error(errors: ValidationErrors) -> UserdirError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                UserdirError::invalid_input(field.to_string(), message)
            })
        })
        .unwrap_or_else(|| UserdirError::invalid_input("request", "validation failed"))
}

/// Rejects blank identifiers before any store or cache access.
pub fn require_id(id: &UserId) -> Result<(), UserdirError> {
    if id.is_blank() {
        tracing::warn!(user_id = %id, "User ID validation failed");
        return Err(UserdirError::invalid_input("id", "user ID is required"));
    }
    Ok(())
}

/// Common validation functions.
pub mod rules {
    use regex::Regex;
    use std::borrow::Cow;
    use std::sync::LazyLock;
    use validator::ValidationError;

    /// Longest accepted display name, counted after trimming.
    pub const MAX_NAME_LENGTH: usize = 100;

    /// Accepted email shape: `local@domain.tld` with an alphabetic TLD.
    pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Invalid email regex")
    });

    fn failure(code: &'static str, message: &'static str) -> ValidationError {
        ValidationError::new(code).with_message(Cow::Borrowed(message))
    }

    /// Validates a display name: non-blank and at most 100 characters.
    pub fn valid_name(name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(failure("name_required", "name is required"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(failure(
                "name_too_long",
                "name must be 100 characters or less",
            ));
        }
        Ok(())
    }

    /// Validates that an address is present and matches [`EMAIL_REGEX`].
    pub fn valid_email(email: &str) -> Result<(), ValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(failure("email_required", "email is required"));
        }
        if !EMAIL_REGEX.is_match(email) {
            return Err(failure("email_invalid", "email format is invalid"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(custom(function = valid_name))]
        name: String,
        #[validate(range(min = 1, max = 149, message = "age must be between 1 and 149"))]
        age: i32,
    }

    #[test]
    fn test_valid_name() {
        assert!(valid_name("Alice").is_ok());
        assert!(valid_name("  Alice  ").is_ok());
        assert!(valid_name("   ").is_err());
        assert!(valid_name(&"a".repeat(100)).is_ok());
        assert!(valid_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_valid_email() {
        assert!(valid_email("alice@x.com").is_ok());
        assert!(valid_email("first.last+tag@mail.example.org").is_ok());
        assert!(valid_email("").is_err());
        assert!(valid_email("no-at-sign").is_err());
        assert!(valid_email("a@b").is_err());
        assert!(valid_email("a@b.c").is_err());
        assert!(valid_email("@x.com").is_err());
        assert!(valid_email("a b@x.com").is_err());
        assert!(valid_email("a@x.c0m").is_err());

        let err = valid_email("   ").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("email is required"));
        let err = valid_email("nope").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("email format is invalid"));
    }

    #[test]
    fn test_require_id() {
        assert!(require_id(&UserId::new("abc")).is_ok());
        let err = require_id(&UserId::new("  ")).unwrap_err();
        assert_eq!(err.field(), Some("id"));
    }

    #[test]
    fn test_validate_request_reports_field() {
        let signup = Signup {
            name: "Bob".to_string(),
            age: 150,
        };
        let err = signup.validate_request().unwrap_err();
        assert_eq!(err.field(), Some("age"));
        assert!(err.to_string().contains("between 1 and 149"));
    }

    #[test]
    fn test_validate_request_first_field_is_stable() {
        let signup = Signup {
            name: String::new(),
            age: 0,
        };
        for _ in 0..10 {
            let err = signup.validate_request().unwrap_err();
            assert_eq!(err.field(), Some("age"));
        }
    }
}
