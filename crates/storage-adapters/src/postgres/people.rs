//! Users, comments and the settings singleton.

use async_trait::async_trait;
use domains::{
    Comment, CommentRepository, Result, Settings, SettingsRepository, User, UserRepository,
};
use uuid::Uuid;

use super::rows::{convert_all, CommentRow, SettingsRow, UserRow};
use super::{db_error, expect_one, PostgresStore};

const USER_COLUMNS: &str = "id, external_id, email, first_name, last_name, image_url, role, \
    is_active, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, post_id, author_id, author_name, author_email, content, \
    is_approved, parent_id, created_at, updated_at";
const SETTINGS_COLUMNS: &str = "id, site_name, site_description, contact_email, timezone, \
    default_category, default_post_status, allow_comments, require_moderation, \
    created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        convert_all(rows)
    }

    async fn insert(&self, u: User) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        ))
        .bind(u.id)
        .bind(u.external_id)
        .bind(u.email)
        .bind(u.first_name)
        .bind(u.last_name)
        .bind(u.image_url)
        .bind(u.role.as_str())
        .bind(u.is_active)
        .bind(u.created_at)
        .bind(u.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, u: User) -> Result<()> {
        let done = sqlx::query(
            "UPDATE users SET email = $2, first_name = $3, last_name = $4, image_url = $5, \
             role = $6, is_active = $7, updated_at = $8 WHERE id = $1",
        )
        .bind(u.id)
        .bind(u.email)
        .bind(u.first_name)
        .bind(u.last_name)
        .bind(u.image_url)
        .bind(u.role.as_str())
        .bind(u.is_active)
        .bind(u.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        expect_one(done.rows_affected(), "User")
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresStore {
    async fn get(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Comment::from))
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 ORDER BY created_at, id"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn insert(&self, c: Comment) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO comments ({COMMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        ))
        .bind(c.id)
        .bind(c.post_id)
        .bind(c.author_id)
        .bind(c.author_name)
        .bind(c.author_email)
        .bind(c.content)
        .bind(c.is_approved)
        .bind(c.parent_id)
        .bind(c.created_at)
        .bind(c.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, c: Comment) -> Result<()> {
        let done = sqlx::query(
            "UPDATE comments SET author_name = $2, author_email = $3, content = $4, \
             is_approved = $5, updated_at = $6 WHERE id = $1",
        )
        .bind(c.id)
        .bind(c.author_name)
        .bind(c.author_email)
        .bind(c.content)
        .bind(c.is_approved)
        .bind(c.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        expect_one(done.rows_affected(), "Comment")
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for PostgresStore {
    async fn get(&self) -> Result<Option<Settings>> {
        let row = sqlx::query_as::<_, SettingsRow>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM settings ORDER BY created_at LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(Settings::try_from).transpose()
    }

    async fn save(&self, s: Settings) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO settings ({SETTINGS_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (id) DO UPDATE SET site_name = EXCLUDED.site_name, \
             site_description = EXCLUDED.site_description, contact_email = EXCLUDED.contact_email, \
             timezone = EXCLUDED.timezone, default_category = EXCLUDED.default_category, \
             default_post_status = EXCLUDED.default_post_status, \
             allow_comments = EXCLUDED.allow_comments, \
             require_moderation = EXCLUDED.require_moderation, updated_at = EXCLUDED.updated_at"
        ))
        .bind(s.id)
        .bind(s.site_name)
        .bind(s.site_description)
        .bind(s.contact_email)
        .bind(s.timezone)
        .bind(s.default_category)
        .bind(s.default_post_status.as_str())
        .bind(s.allow_comments)
        .bind(s.require_moderation)
        .bind(s.created_at)
        .bind(s.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }
}
