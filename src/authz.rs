//! Authorization policy for lifecycle operations.
//!
//! This module centralizes the owner-versus-admin decision so the rule cannot
//! drift between operations. Every lifecycle method takes an explicit
//! [`ActorContext`]; there is no ambient current user.
use crate::error::{EngineError, EngineResult};
use crate::model::Role;

/// The authenticated identity on whose behalf an operation runs.
///
/// Resolved by the embedding service before the engine is called. The engine
/// never parses credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub user_id: u64,
    pub role: Role,
}

impl ActorContext {
    pub fn new(user_id: u64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Allow admins to act on anything and owners to act on their own resources.
///
/// Denial is always an explicit `Forbidden` error, never a silent no-op.
pub fn require_owner_or_admin(
    actor: &ActorContext,
    owner_id: u64,
    what: &str,
) -> EngineResult<()> {
    if actor.is_admin() || actor.user_id == owner_id {
        return Ok(());
    }
    Err(EngineError::Forbidden(format!(
        "{what} belongs to another user"
    )))
}

/// Require the admin role on the acting user.
pub fn require_admin(actor: &ActorContext, what: &str) -> EngineResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    Err(EngineError::Forbidden(format!("{what} requires admin role")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_may_act_on_any_resource() {
        let admin = ActorContext::new(1, Role::Admin);
        assert!(require_owner_or_admin(&admin, 99, "meal request").is_ok());
        assert!(require_admin(&admin, "status update").is_ok());
    }

    #[test]
    fn owner_may_act_on_own_resource_only() {
        let owner = ActorContext::new(7, Role::Employee);
        assert!(require_owner_or_admin(&owner, 7, "meal request").is_ok());

        let err = require_owner_or_admin(&owner, 8, "meal request").expect_err("forbidden");
        assert_eq!(err.kind(), "forbidden");
    }

    #[test]
    fn manager_is_not_admin() {
        let manager = ActorContext::new(3, Role::Manager);
        let err = require_admin(&manager, "status update").expect_err("forbidden");
        assert_eq!(err.kind(), "forbidden");
    }
}
