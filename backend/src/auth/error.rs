//! Authentication and authorization failures

use crate::repositories::StoreError;
use keep_reading_shared::ValidationError;
use thiserror::Error;

/// Outcome of a failed auth operation
///
/// Unknown email and wrong password both map to `InvalidCredentials` with
/// the same message.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Admin access required")]
    NotAuthorized,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
