//! User field validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user field validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Name is too short. Minimum length is {0} characters")]
    NameTooShort(usize),

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Please provide a valid email")]
    InvalidEmail,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 100;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is a valid regex"));

/// Normalize an email for lookup and storage (trim + lowercase)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a display name
///
/// Rules:
/// - 2 to 100 characters after trimming
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    let trimmed = name.trim();

    if trimmed.chars().count() < MIN_NAME_LENGTH {
        return Err(UserValidationError::NameTooShort(MIN_NAME_LENGTH));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address
///
/// Expects an already-normalized value; the shape check is intentionally
/// loose (`local@domain.tld`), full deliverability is not this crate's
/// concern.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Minimum 8 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Name tests

    #[test]
    fn test_valid_names() {
        assert!(validate_name("Alice").is_ok());
        assert!(validate_name("Jo").is_ok());
        assert!(validate_name("  Alice Smith  ").is_ok());
    }

    #[test]
    fn test_name_too_short() {
        assert_eq!(validate_name("A"), Err(UserValidationError::NameTooShort(2)));
        assert_eq!(validate_name("  A  "), Err(UserValidationError::NameTooShort(2)));
        assert_eq!(validate_name(""), Err(UserValidationError::NameTooShort(2)));
    }

    #[test]
    fn test_name_too_long() {
        let long_name = "a".repeat(101);
        assert_eq!(
            validate_name(&long_name),
            Err(UserValidationError::NameTooLong(100))
        );
    }

    // Email tests

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM  "), "alice@example.com");
        assert_eq!(normalize_email("bob@x.com"), "bob@x.com");
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a+b@sub.domain.io").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(validate_email(""), Err(UserValidationError::InvalidEmail));
        assert_eq!(validate_email("no-at-sign"), Err(UserValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b"), Err(UserValidationError::InvalidEmail));
        assert_eq!(
            validate_email("spaces in@local.part"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    // Password tests

    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("Passw0rd!").is_ok());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("1234567"),
            Err(UserValidationError::PasswordTooShort(8))
        );
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(129);
        assert_eq!(
            validate_password(&long_password),
            Err(UserValidationError::PasswordTooLong(128))
        );
    }
}
