//! Authentication module
//!
//! Provides bcrypt password hashing, JWT bearer tokens, the signup/login
//! service, the per-request context middleware and authorization guards.

mod authenticator;
mod context;
mod error;
mod guards;
mod jwt;
mod middleware;
mod password;

pub use authenticator::Authenticator;
pub use context::{Identity, RequestContext};
pub use error::AuthError;
pub use guards::{require_admin, require_authenticated};
pub use jwt::{Claims, TokenCodec, TokenError};
pub use middleware::{authorize_request, bearer_token, resolve_context};
pub use password::{CredentialHasher, DEFAULT_COST};
