//! Signup and login
//!
//! Orchestrates validation, the user store, the credential hasher and the
//! token codec. Every failure leaves the store untouched: the only write
//! is the final `create` in [`Authenticator::signup`].

use super::context::Identity;
use super::error::AuthError;
use super::jwt::TokenCodec;
use super::password::CredentialHasher;
use crate::repositories::{NewUser, StoreError, UserRecord, UserStore};
use chrono::Duration;
use keep_reading_shared::validation::{validate_login, validate_signup};
use keep_reading_shared::{AuthPayload, LoginInput, Role, SignupInput};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Hashed once, then verified against when the email is unknown
const DUMMY_PASSWORD: &str = "keep-reading-unknown-account";

/// Authentication service, built once at startup
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    tokens: TokenCodec,
    token_ttl: Duration,
    dummy_digest: OnceCell<String>,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: CredentialHasher,
        tokens: TokenCodec,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            token_ttl,
            dummy_digest: OnceCell::new(),
        }
    }

    /// Create an account with the `USER` role and sign it in
    pub async fn signup(&self, input: &SignupInput) -> Result<AuthPayload, AuthError> {
        validate_signup(input)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let digest = self.hasher.hash_async(input.password.clone()).await?;
        let user = self
            .users
            .create(NewUser {
                email: input.email.clone(),
                password_hash: digest,
                full_name: input.full_name.clone(),
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                // lost a race with a concurrent signup for the same email
                StoreError::Conflict(_) => AuthError::DuplicateEmail,
                other => AuthError::Store(other),
            })?;

        info!(user_id = %user.id, "User signed up");
        self.issue(&user)
    }

    /// Sign in with email and password
    pub async fn login(&self, input: &LoginInput) -> Result<AuthPayload, AuthError> {
        validate_login(input)?;

        let user = match self.users.find_by_email(&input.email).await? {
            Some(user) => user,
            None => {
                debug!("Login for unknown email");
                // same bcrypt work as a wrong password
                let digest = self
                    .dummy_digest
                    .get_or_try_init(|| self.hasher.hash_async(DUMMY_PASSWORD.to_string()))
                    .await?;
                self.hasher
                    .verify_async(input.password.clone(), digest.clone())
                    .await?;
                return Err(AuthError::InvalidCredentials);
            }
        };

        let valid = self
            .hasher
            .verify_async(input.password.clone(), user.password_hash.clone())
            .await?;
        if !valid {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        self.issue(&user)
    }

    /// Verify a bearer token. Expired and forged tokens are indistinguishable here.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.tokens.verify(token).map_err(|e| {
            debug!(reason = %e, "Token rejected");
            AuthError::InvalidToken
        })
    }

    /// Create an account with the given role unless the email is taken
    ///
    /// Returns `true` when a record was created. Used to seed the first
    /// administrator.
    pub async fn provision(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
    ) -> Result<bool, AuthError> {
        validate_signup(&SignupInput {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        })?;

        if self.users.find_by_email(email).await?.is_some() {
            return Ok(false);
        }

        let digest = self.hasher.hash_async(password.to_string()).await?;
        match self
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash: digest,
                full_name: full_name.to_string(),
                role,
            })
            .await
        {
            Ok(user) => {
                info!(user_id = %user.id, role = %role, "Provisioned account");
                Ok(true)
            }
            Err(StoreError::Conflict(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Token lifetime in seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.num_seconds()
    }

    fn issue(&self, user: &UserRecord) -> Result<AuthPayload, AuthError> {
        let identity = Identity {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role(),
        };
        let token = self.tokens.issue(&identity, self.token_ttl)?;

        Ok(AuthPayload {
            token,
            user: user.to_public(),
        })
    }
}
