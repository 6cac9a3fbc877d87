//! User records mirrored from the identity provider, and role management.

use std::sync::Arc;

use chrono::Utc;
use domains::{AppError, ExternalUserProfile, Identity, Result, Role, User, UserRepository};
use tracing::info;
use uuid::Uuid;

use crate::authz::Gate;

#[derive(Clone)]
pub struct UserService {
    gate: Gate,
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(gate: Gate, users: Arc<dyn UserRepository>) -> Self {
        Self { gate, users }
    }

    /// Creates a `user`-role record. Repeated deliveries return the record
    /// already stored for that external id, unchanged.
    pub async fn create_from_provider(&self, profile: ExternalUserProfile) -> Result<User> {
        if let Some(existing) = self.users.find_by_external_id(&profile.external_id).await? {
            info!(user_id = %existing.id, "user already exists, skipping create");
            return Ok(existing);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            external_id: profile.external_id,
            email: profile.email,
            first_name: non_empty(profile.first_name),
            last_name: non_empty(profile.last_name),
            image_url: non_empty(profile.image_url),
            role: Role::User,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.clone()).await?;
        info!(user_id = %user.id, external_id = %user.external_id, "user created");
        Ok(user)
    }

    pub async fn update_from_provider(&self, profile: ExternalUserProfile) -> Result<User> {
        let existing = self
            .users
            .find_by_external_id(&profile.external_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let updated = User {
            email: profile.email,
            first_name: non_empty(profile.first_name),
            last_name: non_empty(profile.last_name),
            image_url: non_empty(profile.image_url),
            updated_at: Utc::now(),
            ..existing
        };
        self.users.update(updated.clone()).await?;
        info!(user_id = %updated.id, "user profile updated");
        Ok(updated)
    }

    /// Absent users are ignored.
    pub async fn delete_from_provider(&self, external_id: &str) -> Result<()> {
        if let Some(user) = self.users.find_by_external_id(external_id).await? {
            self.users.delete(user.id).await?;
            info!(user_id = %user.id, "user deleted");
        }
        Ok(())
    }

    pub async fn by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        self.users.find_by_external_id(external_id).await
    }

    /// The caller's own record.
    pub async fn current(&self, identity: Option<&Identity>) -> Result<Option<User>> {
        let identity = identity.ok_or(AppError::Unauthenticated)?;
        self.users.find_by_external_id(&identity.subject).await
    }

    pub async fn list(&self, identity: Option<&Identity>) -> Result<Vec<User>> {
        self.gate
            .require(identity, Role::ADMIN, "Only admins can view all users")
            .await?;
        self.users.list().await
    }

    pub async fn update_role(
        &self,
        identity: Option<&Identity>,
        user_id: Uuid,
        role: Role,
    ) -> Result<User> {
        let admin = self
            .gate
            .require(identity, Role::ADMIN, "Only admins can update user roles")
            .await?;
        let target = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let previous = target.role;
        let updated = User {
            role,
            updated_at: Utc::now(),
            ..target
        };
        self.users.update(updated.clone()).await?;
        info!(user_id = %user_id, from = %previous, to = %role, by = %admin.id, "role changed");
        Ok(updated)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
