use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AuthorSummary, Category, Region, StorageId};

/// Publication lifecycle of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(AppError::validation(format!("unknown post status '{other}'"))),
        }
    }
}

/// A news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Short teaser shown on cards
    pub description: String,
    /// Rich-text body (HTML)
    pub content: String,
    pub image_id: Option<StorageId>,
    /// Public URL resolved from `image_id` at write time
    pub image_url: Option<String>,
    pub category_id: Uuid,
    pub region_id: Option<Uuid>,
    pub author_id: Uuid,
    pub status: PostStatus,
    pub featured: bool,
    pub view_count: u64,
    /// Set once, on the first transition into `Published`
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Case-insensitive containment over title, description and content.
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title_matches_lowercase(needle)
            || self.description.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }

    pub fn title_matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
    }
}

/// Arguments of the create-post mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub description: String,
    pub content: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub region_id: Option<Uuid>,
    #[serde(default)]
    pub image_id: Option<StorageId>,
    pub status: PostStatus,
    #[serde(default)]
    pub featured: bool,
}

/// Full-document patch of a post; every editable field is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostUpdate {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub region_id: Option<Uuid>,
    #[serde(default)]
    pub image_id: Option<StorageId>,
    pub status: PostStatus,
    #[serde(default)]
    pub featured: bool,
}

/// Filters for the public listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPostsFilter {
    pub limit: Option<usize>,
    pub category_slug: Option<String>,
    pub region_slug: Option<String>,
    pub featured: Option<bool>,
}

/// Filters for the staff listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostListFilter {
    pub status: Option<PostStatus>,
    pub author_id: Option<Uuid>,
}

/// A post joined with its category, region and author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPost {
    #[serde(flatten)]
    pub post: Post,
    pub category: Option<Category>,
    pub region: Option<Region>,
    pub author: Option<AuthorSummary>,
}
