//! Authorization gate.
//!
//! Roles are never taken from the token: the caller's user record is looked
//! up by external id on every privileged call.

use std::sync::Arc;

use domains::{AppError, Identity, Post, Result, Role, User, UserRepository};
use tracing::warn;

#[derive(Clone)]
pub struct Gate {
    users: Arc<dyn UserRepository>,
}

impl Gate {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// The stored user behind `identity`, if any.
    pub async fn caller(&self, identity: Option<&Identity>) -> Result<Option<User>> {
        match identity {
            Some(identity) => self.users.find_by_external_id(&identity.subject).await,
            None => Ok(None),
        }
    }

    /// Fails with `Not authenticated` without an identity, and with `denied`
    /// when the caller has no user record or a role outside `allowed`.
    pub async fn require(
        &self,
        identity: Option<&Identity>,
        allowed: &[Role],
        denied: &str,
    ) -> Result<User> {
        let identity = identity.ok_or(AppError::Unauthenticated)?;
        match self.users.find_by_external_id(&identity.subject).await? {
            Some(user) if allowed.contains(&user.role) => Ok(user),
            Some(user) => {
                warn!(subject = %identity.subject, role = %user.role, "role check failed");
                Err(AppError::forbidden(denied))
            }
            None => {
                warn!(subject = %identity.subject, "no user record for identity");
                Err(AppError::forbidden(denied))
            }
        }
    }
}

/// Editors may only touch posts they authored; admins may touch any.
pub fn ensure_owns(user: &User, post: &Post, denied: &str) -> Result<()> {
    if user.role == Role::Editor && post.author_id != user.id {
        return Err(AppError::forbidden(denied));
    }
    Ok(())
}

/// Whether `viewer` may see `post` while it is not published.
pub fn can_view(post: &Post, viewer: Option<&User>) -> bool {
    post.is_published() || viewer.is_some_and(|u| u.role.is_staff() || u.id == post.author_id)
}
