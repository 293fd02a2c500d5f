//! The caller of an operation and the guards services apply to it.

use crate::error::{LaunchpadError, Result};
use crate::middleware::AuthContext;

use super::Role;

/// Who is performing an operation. Anonymous callers have no user id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Option<String>,
    pub roles: Vec<Role>,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            roles,
        }
    }

    pub fn member(user_id: impl Into<String>) -> Self {
        Self::user(user_id, vec![Role::Member])
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::user(user_id, vec![Role::Admin])
    }

    /// Actor for a request's authentication context.
    pub fn from_auth(ctx: &AuthContext) -> Self {
        if !ctx.is_authenticated() {
            return Self::anonymous();
        }
        Self::user(ctx.user_id.clone(), Role::parse_all(ctx.roles.as_slice()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Admins and moderators.
    pub fn can_moderate(&self) -> bool {
        self.is_admin() || self.has_role(Role::Moderator)
    }

    /// Whether this actor authored a record owned by `author_id`.
    pub fn is(&self, author_id: &str) -> bool {
        self.user_id.as_deref() == Some(author_id)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Guards
// ═══════════════════════════════════════════════════════════════════════════════

/// Require a signed-in caller and return their user id.
pub fn ensure_authenticated(actor: &Actor) -> Result<&str> {
    actor
        .user_id
        .as_deref()
        .ok_or_else(|| LaunchpadError::unauthorized("You must be signed in to do that"))
}

/// Require the admin role.
pub fn ensure_admin(actor: &Actor) -> Result<()> {
    ensure_authenticated(actor)?;
    if actor.is_admin() {
        Ok(())
    } else {
        Err(LaunchpadError::access_denied("Only administrators can do that"))
    }
}

/// Require the admin or moderator role.
pub fn ensure_moderator(actor: &Actor) -> Result<()> {
    ensure_authenticated(actor)?;
    if actor.can_moderate() {
        Ok(())
    } else {
        Err(LaunchpadError::access_denied("Only moderators can do that"))
    }
}

/// Require an admin or the record's author.
pub fn ensure_admin_or_author(actor: &Actor, author_id: &str) -> Result<()> {
    ensure_authenticated(actor)?;
    if actor.is_admin() || actor.is(author_id) {
        Ok(())
    } else {
        Err(LaunchpadError::access_denied("Only the author or an administrator can do that"))
    }
}
