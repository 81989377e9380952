//! Input validation functions
//!
//! Auth inputs are checked by hand so the messages match what clients
//! already display; catalog inputs use the `validator` derives on the
//! request types in [`crate::types`].

use crate::errors::ValidationError;
use crate::types::{CreateBookInput, CreateCategoryInput, LoginInput, SignupInput, UpdateBookInput, UpdateProfileInput};
use regex_lite::Regex;
use std::sync::OnceLock;
use validator::Validate;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum password length, in UTF-8 bytes. bcrypt ignores anything past it.
pub const MAX_PASSWORD_BYTES: usize = 72;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn slug_regex() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap())
}

/// Validate email shape: `local@domain.tld`, no whitespace
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::PasswordTooLong {
            max: MAX_PASSWORD_BYTES,
        });
    }
    Ok(())
}

/// Validate a signup request
///
/// Order matters: presence, then password length, then email shape.
pub fn validate_signup(input: &SignupInput) -> Result<(), ValidationError> {
    if input.email.is_empty() || input.password.is_empty() || input.full_name.is_empty() {
        return Err(ValidationError::MissingSignupFields);
    }
    validate_password(&input.password)?;
    validate_email(&input.email)
}

/// Validate a login request. Only presence is checked.
pub fn validate_login(input: &LoginInput) -> Result<(), ValidationError> {
    if input.email.is_empty() || input.password.is_empty() {
        return Err(ValidationError::MissingLoginFields);
    }
    Ok(())
}

/// Validate a profile update
pub fn validate_profile_update(input: &UpdateProfileInput) -> Result<(), ValidationError> {
    if let Some(name) = &input.full_name {
        if name.trim().is_empty() {
            return Err(ValidationError::field("fullName", "Full name cannot be empty"));
        }
    }
    Ok(())
}

pub fn validate_create_book(input: &CreateBookInput) -> Result<(), ValidationError> {
    input.validate().map_err(ValidationError::from)
}

pub fn validate_update_book(input: &UpdateBookInput) -> Result<(), ValidationError> {
    input.validate().map_err(ValidationError::from)
}

/// Validate a new category; slugs are lowercase kebab-case
pub fn validate_create_category(input: &CreateCategoryInput) -> Result<(), ValidationError> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::field("name", "Name is required"));
    }
    if !slug_regex().is_match(&input.slug) {
        return Err(ValidationError::field(
            "slug",
            "Slug must be lowercase letters, digits and single dashes",
        ));
    }
    Ok(())
}
