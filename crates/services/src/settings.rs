use std::sync::Arc;

use chrono::Utc;
use domains::{
    AppError, CategoryRepository, Identity, PostStatus, Result, Role, Settings,
    SettingsRepository, SettingsUpdate,
};
use tracing::info;
use uuid::Uuid;

use crate::authz::Gate;

#[derive(Clone)]
pub struct SettingsService {
    gate: Gate,
    settings: Arc<dyn SettingsRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl SettingsService {
    pub fn new(
        gate: Gate,
        settings: Arc<dyn SettingsRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            gate,
            settings,
            categories,
        }
    }

    pub async fn get(&self) -> Result<Option<Settings>> {
        self.settings.get().await
    }

    /// Creates the singleton on first call, patches it afterwards.
    pub async fn update(
        &self,
        identity: Option<&Identity>,
        input: SettingsUpdate,
    ) -> Result<Settings> {
        self.gate
            .require(identity, Role::ADMIN, "Only admins can update settings")
            .await?;

        if input.site_name.trim().is_empty() {
            return Err(AppError::validation("Site name is required"));
        }
        if !input.contact_email.contains('@') {
            return Err(AppError::validation("Contact email is invalid"));
        }
        if input.default_post_status == PostStatus::Archived {
            return Err(AppError::validation(
                "Default post status must be draft or published",
            ));
        }
        if let Some(category_id) = input.default_category {
            if self.categories.get(category_id).await?.is_none() {
                return Err(AppError::not_found("Category"));
            }
        }

        let now = Utc::now();
        let (id, created_at) = match self.settings.get().await? {
            Some(existing) => (existing.id, existing.created_at),
            None => (Uuid::now_v7(), now),
        };
        let settings = Settings {
            id,
            site_name: input.site_name,
            site_description: input.site_description,
            contact_email: input.contact_email,
            timezone: input.timezone,
            default_category: input.default_category,
            default_post_status: input.default_post_status,
            allow_comments: input.allow_comments,
            require_moderation: input.require_moderation,
            created_at,
            updated_at: now,
        };
        self.settings.save(settings.clone()).await?;
        info!(settings_id = %settings.id, "settings saved");
        Ok(settings)
    }
}
