//! Authentication middleware
//!
//! Resolves the `Authorization: Bearer <token>` header into a
//! [`RequestContext`] and stores it in the request extensions.
//!
//! A missing, malformed, forged or expired token yields an anonymous
//! context. The request always proceeds; guards in the handlers decide
//! whether anonymous callers are allowed.

use super::authenticator::Authenticator;
use super::context::RequestContext;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Extract the token from a `Bearer` authorization header
///
/// The scheme is matched case-insensitively. `None` when the header is
/// absent, not UTF-8, uses another scheme or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Build the request context from the request headers
pub fn resolve_context(auth: &Authenticator, headers: &HeaderMap) -> RequestContext {
    if !headers.contains_key(AUTHORIZATION) {
        return RequestContext::anonymous();
    }

    let Some(token) = bearer_token(headers) else {
        debug!("Ignoring malformed authorization header");
        return RequestContext::anonymous();
    };

    match auth.verify(token) {
        Ok(identity) => RequestContext::authenticated(identity),
        Err(_) => RequestContext::anonymous(),
    }
}

/// Middleware attaching a [`RequestContext`] to every request
pub async fn authorize_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = resolve_context(state.auth(), request.headers());
    if let Some(identity) = ctx.identity() {
        debug!(user_id = %identity.user_id, role = %identity.role, "Authenticated request");
    }
    request.extensions_mut().insert(ctx);
    next.run(request).await
}
