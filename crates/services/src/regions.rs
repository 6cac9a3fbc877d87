use std::sync::Arc;

use chrono::Utc;
use domains::{
    AppError, Identity, NewRegion, PostRepository, Region, RegionRepository, RegionUpdate,
    Result, Role,
};
use tracing::info;
use uuid::Uuid;

use crate::authz::Gate;
use crate::slug;

#[derive(Clone)]
pub struct RegionService {
    gate: Gate,
    regions: Arc<dyn RegionRepository>,
    posts: Arc<dyn PostRepository>,
}

impl RegionService {
    pub fn new(
        gate: Gate,
        regions: Arc<dyn RegionRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        Self { gate, regions, posts }
    }

    pub async fn create(&self, identity: Option<&Identity>, input: NewRegion) -> Result<Region> {
        self.gate
            .require(identity, Role::ADMIN, "Only admins can create regions")
            .await?;

        let (name, country) = required_fields(&input.name, &input.country)?;
        let slug = slug::resolve(&input.slug, &name)?;
        self.ensure_slug_free(&slug, None).await?;

        let now = Utc::now();
        let region = Region {
            id: Uuid::now_v7(),
            name,
            slug,
            country,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.regions.insert(region.clone()).await?;
        info!(region_id = %region.id, slug = %region.slug, "region created");
        Ok(region)
    }

    pub async fn active(&self) -> Result<Vec<Region>> {
        self.regions.list_active().await
    }

    pub async fn all(&self, identity: Option<&Identity>) -> Result<Vec<Region>> {
        self.gate
            .require(identity, Role::ADMIN, "Only admins can view all regions")
            .await?;
        self.regions.list().await
    }

    pub async fn by_slug(&self, slug: &str) -> Result<Option<Region>> {
        self.regions.find_by_slug(slug).await
    }

    pub async fn update(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
        input: RegionUpdate,
    ) -> Result<Region> {
        self.gate
            .require(identity, Role::ADMIN, "Only admins can update regions")
            .await?;
        let existing = self
            .regions
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Region"))?;

        let (name, country) = required_fields(&input.name, &input.country)?;
        slug::validate(&input.slug)?;
        self.ensure_slug_free(&input.slug, Some(id)).await?;

        let updated = Region {
            name,
            slug: input.slug,
            country,
            is_active: input.is_active,
            updated_at: Utc::now(),
            ..existing
        };
        self.regions.update(updated.clone()).await?;
        info!(region_id = %id, "region updated");
        Ok(updated)
    }

    pub async fn delete(&self, identity: Option<&Identity>, id: Uuid) -> Result<()> {
        self.gate
            .require(identity, Role::ADMIN, "Only admins can delete regions")
            .await?;
        if self.regions.get(id).await?.is_none() {
            return Err(AppError::not_found("Region"));
        }
        if self.posts.any_in_region(id).await? {
            return Err(AppError::conflict("Cannot delete region with existing posts"));
        }
        self.regions.delete(id).await?;
        info!(region_id = %id, "region deleted");
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, own_id: Option<Uuid>) -> Result<()> {
        match self.regions.find_by_slug(slug).await? {
            Some(other) if Some(other.id) != own_id => Err(AppError::conflict(format!(
                "A region with slug '{slug}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}

fn required_fields(name: &str, country: &str) -> Result<(String, String)> {
    let (name, country) = (name.trim(), country.trim());
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if country.is_empty() {
        return Err(AppError::validation("Country is required"));
    }
    Ok((name.to_string(), country.to_string()))
}
