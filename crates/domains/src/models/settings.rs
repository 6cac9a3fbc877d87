use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PostStatus;

/// Site-wide configuration. Exactly one record exists once saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub id: Uuid,
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    /// IANA zone name, informational only
    pub timezone: String,
    pub default_category: Option<Uuid>,
    pub default_post_status: PostStatus,
    pub allow_comments: bool,
    pub require_moderation: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    pub fn comments_allowed(settings: Option<&Settings>) -> bool {
        settings.map_or(true, |s| s.allow_comments)
    }

    pub fn moderation_required(settings: Option<&Settings>) -> bool {
        settings.is_some_and(|s| s.require_moderation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub timezone: String,
    #[serde(default)]
    pub default_category: Option<Uuid>,
    pub default_post_status: PostStatus,
    pub allow_comments: bool,
    pub require_moderation: bool,
}
