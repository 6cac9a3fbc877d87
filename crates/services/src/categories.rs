use std::sync::Arc;

use chrono::Utc;
use domains::{
    AppError, Category, CategoryRepository, CategoryUpdate, Identity, NewCategory,
    PostRepository, Result, Role, SettingsRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::authz::Gate;
use crate::slug;

#[derive(Clone)]
pub struct CategoryService {
    gate: Gate,
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl CategoryService {
    pub fn new(
        gate: Gate,
        categories: Arc<dyn CategoryRepository>,
        posts: Arc<dyn PostRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            gate,
            categories,
            posts,
            settings,
        }
    }

    pub async fn create(
        &self,
        identity: Option<&Identity>,
        input: NewCategory,
    ) -> Result<Category> {
        let user = self
            .gate
            .require(identity, Role::STAFF, "Only admins and editors can create categories")
            .await?;

        let name = required_name(&input.name)?;
        let slug = slug::resolve(&input.slug, &name)?;
        self.ensure_slug_free(&slug, None).await?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            name,
            slug,
            description: input.description,
            color: input.color,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: user.id,
        };
        self.categories.insert(category.clone()).await?;
        info!(category_id = %category.id, slug = %category.slug, "category created");
        Ok(category)
    }

    pub async fn active(&self) -> Result<Vec<Category>> {
        self.categories.list_active().await
    }

    pub async fn all(&self, identity: Option<&Identity>) -> Result<Vec<Category>> {
        self.gate
            .require(identity, Role::STAFF, "Only admins and editors can view all categories")
            .await?;
        self.categories.list().await
    }

    pub async fn by_slug(&self, slug: &str) -> Result<Option<Category>> {
        self.categories.find_by_slug(slug).await
    }

    pub async fn update(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
        input: CategoryUpdate,
    ) -> Result<Category> {
        self.gate
            .require(identity, Role::ADMIN, "Only admins can update categories")
            .await?;
        let existing = self
            .categories
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        let name = required_name(&input.name)?;
        slug::validate(&input.slug)?;
        self.ensure_slug_free(&input.slug, Some(id)).await?;

        let updated = Category {
            name,
            slug: input.slug,
            description: input.description,
            color: input.color,
            is_active: input.is_active,
            updated_at: Utc::now(),
            ..existing
        };
        self.categories.update(updated.clone()).await?;
        info!(category_id = %id, "category updated");
        Ok(updated)
    }

    /// Refuses while any post still references the category.
    pub async fn delete(&self, identity: Option<&Identity>, id: Uuid) -> Result<()> {
        self.gate
            .require(identity, Role::ADMIN, "Only admins can delete categories")
            .await?;
        if self.categories.get(id).await?.is_none() {
            return Err(AppError::not_found("Category"));
        }
        if self.posts.any_in_category(id).await? {
            return Err(AppError::conflict("Cannot delete category with existing posts"));
        }

        self.categories.delete(id).await?;

        if let Some(mut settings) = self.settings.get().await? {
            if settings.default_category == Some(id) {
                settings.default_category = None;
                settings.updated_at = Utc::now();
                self.settings.save(settings).await?;
            }
        }
        info!(category_id = %id, "category deleted");
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, own_id: Option<Uuid>) -> Result<()> {
        match self.categories.find_by_slug(slug).await? {
            Some(other) if Some(other.id) != own_id => Err(AppError::conflict(format!(
                "A category with slug '{slug}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}

fn required_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    Ok(name.to_string())
}
