//! Categories, regions and posts.

use async_trait::async_trait;
use domains::{
    Category, CategoryRepository, Post, PostRepository, PostStatus, Region, RegionRepository,
    Result,
};
use uuid::Uuid;

use super::rows::{convert_all, CategoryRow, PostRow, RegionRow};
use super::{db_error, expect_one, PostgresStore};

const CATEGORY_COLUMNS: &str =
    "id, name, slug, description, color, is_active, created_at, updated_at, created_by";
const REGION_COLUMNS: &str = "id, name, slug, country, is_active, created_at, updated_at";
const POST_COLUMNS: &str = "id, title, slug, description, content, image_id, image_url, \
    category_id, region_id, author_id, status, featured, view_count, published_at, \
    created_at, updated_at";

#[async_trait]
impl CategoryRepository for PostgresStore {
    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Category::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Category::from))
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn list_active(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn insert(&self, c: Category) -> Result<()> {
        sqlx::query(
            "INSERT INTO categories \
             (id, name, slug, description, color, is_active, created_at, updated_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(c.id)
        .bind(c.name)
        .bind(c.slug)
        .bind(c.description)
        .bind(c.color)
        .bind(c.is_active)
        .bind(c.created_at)
        .bind(c.updated_at)
        .bind(c.created_by)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, c: Category) -> Result<()> {
        let done = sqlx::query(
            "UPDATE categories SET name = $2, slug = $3, description = $4, color = $5, \
             is_active = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(c.id)
        .bind(c.name)
        .bind(c.slug)
        .bind(c.description)
        .bind(c.color)
        .bind(c.is_active)
        .bind(c.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        expect_one(done.rows_affected(), "Category")
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl RegionRepository for PostgresStore {
    async fn get(&self, id: Uuid) -> Result<Option<Region>> {
        let row = sqlx::query_as::<_, RegionRow>(&format!(
            "SELECT {REGION_COLUMNS} FROM regions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Region::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Region>> {
        let row = sqlx::query_as::<_, RegionRow>(&format!(
            "SELECT {REGION_COLUMNS} FROM regions WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(Region::from))
    }

    async fn list(&self) -> Result<Vec<Region>> {
        let rows = sqlx::query_as::<_, RegionRow>(&format!(
            "SELECT {REGION_COLUMNS} FROM regions ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Region::from).collect())
    }

    async fn list_active(&self) -> Result<Vec<Region>> {
        let rows = sqlx::query_as::<_, RegionRow>(&format!(
            "SELECT {REGION_COLUMNS} FROM regions WHERE is_active ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(Region::from).collect())
    }

    async fn insert(&self, r: Region) -> Result<()> {
        sqlx::query(
            "INSERT INTO regions (id, name, slug, country, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(r.id)
        .bind(r.name)
        .bind(r.slug)
        .bind(r.country)
        .bind(r.is_active)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, r: Region) -> Result<()> {
        let done = sqlx::query(
            "UPDATE regions SET name = $2, slug = $3, country = $4, is_active = $5, \
             updated_at = $6 WHERE id = $1",
        )
        .bind(r.id)
        .bind(r.name)
        .bind(r.slug)
        .bind(r.country)
        .bind(r.is_active)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        expect_one(done.rows_affected(), "Region")
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM regions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresStore {
    async fn get(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(Post::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(Post::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        convert_all(rows)
    }

    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE status = $1 ORDER BY id"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        convert_all(rows)
    }

    async fn any_in_category(&self, category_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE category_id = $1)")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn any_in_region(&self, region_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE region_id = $1)")
            .bind(region_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn insert(&self, p: Post) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO posts ({POST_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
        ))
        .bind(p.id)
        .bind(p.title)
        .bind(p.slug)
        .bind(p.description)
        .bind(p.content)
        .bind(p.image_id.map(|id| id.to_string()))
        .bind(p.image_url)
        .bind(p.category_id)
        .bind(p.region_id)
        .bind(p.author_id)
        .bind(p.status.as_str())
        .bind(p.featured)
        .bind(i64::try_from(p.view_count).unwrap_or(i64::MAX))
        .bind(p.published_at)
        .bind(p.created_at)
        .bind(p.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    /// The view counter is left alone so concurrent increments are not lost.
    async fn update(&self, p: Post) -> Result<()> {
        let done = sqlx::query(
            "UPDATE posts SET title = $2, slug = $3, description = $4, content = $5, \
             image_id = $6, image_url = $7, category_id = $8, region_id = $9, status = $10, \
             featured = $11, published_at = $12, updated_at = $13 WHERE id = $1",
        )
        .bind(p.id)
        .bind(p.title)
        .bind(p.slug)
        .bind(p.description)
        .bind(p.content)
        .bind(p.image_id.map(|id| id.to_string()))
        .bind(p.image_url)
        .bind(p.category_id)
        .bind(p.region_id)
        .bind(p.status.as_str())
        .bind(p.featured)
        .bind(p.published_at)
        .bind(p.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        expect_one(done.rows_affected(), "Post")
    }

    async fn increment_views(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
