//! Row shapes as Postgres returns them, and their conversion into domain models.
//! Enum columns are TEXT; the counters are BIGINT.

use chrono::{DateTime, Utc};
use domains::{AppError, Category, Comment, Post, Region, Result, Settings, StorageId, User};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub(super) struct UserRow {
    id: Uuid,
    external_id: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            external_id: row.external_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            image_url: row.image_url,
            role: row.role.parse()?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
pub(super) struct CategoryRow {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    color: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Uuid,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            color: row.color,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
        }
    }
}

#[derive(FromRow)]
pub(super) struct RegionRow {
    id: Uuid,
    name: String,
    slug: String,
    country: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RegionRow> for Region {
    fn from(row: RegionRow) -> Self {
        Region {
            id: row.id,
            name: row.name,
            slug: row.slug,
            country: row.country,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
pub(super) struct PostRow {
    id: Uuid,
    title: String,
    slug: String,
    description: String,
    content: String,
    image_id: Option<String>,
    image_url: Option<String>,
    category_id: Uuid,
    region_id: Option<Uuid>,
    author_id: Uuid,
    status: String,
    featured: bool,
    view_count: i64,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = AppError;

    fn try_from(row: PostRow) -> Result<Self> {
        Ok(Post {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            content: row.content,
            image_id: row.image_id.as_deref().map(StorageId::parse).transpose()?,
            image_url: row.image_url,
            category_id: row.category_id,
            region_id: row.region_id,
            author_id: row.author_id,
            status: row.status.parse()?,
            featured: row.featured,
            view_count: u64::try_from(row.view_count).unwrap_or(0),
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
pub(super) struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    author_id: Option<Uuid>,
    author_name: String,
    author_email: String,
    content: String,
    is_approved: bool,
    parent_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_id: row.post_id,
            author_id: row.author_id,
            author_name: row.author_name,
            author_email: row.author_email,
            content: row.content,
            is_approved: row.is_approved,
            parent_id: row.parent_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
pub(super) struct SettingsRow {
    id: Uuid,
    site_name: String,
    site_description: String,
    contact_email: String,
    timezone: String,
    default_category: Option<Uuid>,
    default_post_status: String,
    allow_comments: bool,
    require_moderation: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SettingsRow> for Settings {
    type Error = AppError;

    fn try_from(row: SettingsRow) -> Result<Self> {
        Ok(Settings {
            id: row.id,
            site_name: row.site_name,
            site_description: row.site_description,
            contact_email: row.contact_email,
            timezone: row.timezone,
            default_category: row.default_category,
            default_post_status: row.default_post_status.parse()?,
            allow_comments: row.allow_comments,
            require_moderation: row.require_moderation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Converts a batch of rows, failing on the first corrupt one.
pub(super) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}
