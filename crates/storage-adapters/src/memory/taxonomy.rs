//! Categories and regions.

use async_trait::async_trait;
use domains::{Category, CategoryRepository, Region, RegionRepository, Result};
use uuid::Uuid;

use super::{collect_sorted, find_first, insert_new, replace, MemoryStore};

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.categories.get(&id).map(|c| c.clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(find_first(&self.categories, |c| c.slug == slug))
    }

    async fn list(&self) -> Result<Vec<Category>> {
        Ok(collect_sorted(&self.categories, |_| true))
    }

    async fn list_active(&self) -> Result<Vec<Category>> {
        Ok(collect_sorted(&self.categories, |c| c.is_active))
    }

    async fn insert(&self, category: Category) -> Result<()> {
        insert_new(&self.categories, category.id, category, "Category")
    }

    async fn update(&self, category: Category) -> Result<()> {
        replace(&self.categories, category.id, category, "Category")
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.categories.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl RegionRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Region>> {
        Ok(self.regions.get(&id).map(|r| r.clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Region>> {
        Ok(find_first(&self.regions, |r| r.slug == slug))
    }

    async fn list(&self) -> Result<Vec<Region>> {
        Ok(collect_sorted(&self.regions, |_| true))
    }

    async fn list_active(&self) -> Result<Vec<Region>> {
        Ok(collect_sorted(&self.regions, |r| r.is_active))
    }

    async fn insert(&self, region: Region) -> Result<()> {
        insert_new(&self.regions, region.id, region, "Region")
    }

    async fn update(&self, region: Region) -> Result<()> {
        replace(&self.regions, region.id, region, "Region")
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.regions.remove(&id);
        Ok(())
    }
}
