//! Error types shared by the backend and any Rust client

use thiserror::Error;

/// Input rejected before it reaches a store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email, password, and full name are required")]
    MissingSignupFields,

    #[error("Email and password are required")]
    MissingLoginFields,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Password must be at most {max} bytes long")]
    PasswordTooLong { max: usize },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("{field}: {message}")]
    Field { field: String, message: String },
}

impl ValidationError {
    /// Create a field-level validation error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    /// Keeps the first failing field (by name) so messages are stable.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        fields
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                ValidationError::field(field.to_string(), message)
            })
            .unwrap_or_else(|| ValidationError::field("input", "is invalid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short_message() {
        let err = ValidationError::PasswordTooShort { min: 6 };
        assert_eq!(err.to_string(), "Password must be at least 6 characters long");
    }

    #[test]
    fn test_password_too_long_message() {
        let err = ValidationError::PasswordTooLong { max: 72 };
        assert_eq!(err.to_string(), "Password must be at most 72 bytes long");
    }

    #[test]
    fn test_field_error_message() {
        let err = ValidationError::field("price", "Price cannot be negative");
        assert_eq!(err.to_string(), "price: Price cannot be negative");
    }
}
