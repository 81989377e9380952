//! Authorization guards
//!
//! Handlers call these before touching any store, so a rejected call has
//! no side effects.

use super::context::{Identity, RequestContext};
use super::error::AuthError;

/// Require a signed-in caller
pub fn require_authenticated(ctx: &RequestContext) -> Result<&Identity, AuthError> {
    ctx.identity().ok_or(AuthError::NotAuthenticated)
}

/// Require a signed-in caller with the `ADMIN` role
pub fn require_admin(ctx: &RequestContext) -> Result<&Identity, AuthError> {
    let identity = require_authenticated(ctx)?;
    if !identity.is_admin() {
        return Err(AuthError::NotAuthorized);
    }
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keep_reading_shared::Role;
    use uuid::Uuid;

    fn ctx(role: Role) -> RequestContext {
        RequestContext::authenticated(Identity {
            user_id: Uuid::new_v4(),
            email: "reader@example.com".to_string(),
            role,
        })
    }

    #[test]
    fn test_anonymous_is_not_authenticated() {
        let anon = RequestContext::anonymous();
        assert!(matches!(require_authenticated(&anon), Err(AuthError::NotAuthenticated)));
        assert!(matches!(require_admin(&anon), Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn test_user_passes_authenticated_guard_only() {
        let user = ctx(Role::User);
        assert!(require_authenticated(&user).is_ok());
        assert!(matches!(require_admin(&user), Err(AuthError::NotAuthorized)));
    }

    #[test]
    fn test_admin_passes_both_guards() {
        let admin = ctx(Role::Admin);
        assert!(require_authenticated(&admin).is_ok());
        assert_eq!(require_admin(&admin).unwrap().role, Role::Admin);
    }
}
