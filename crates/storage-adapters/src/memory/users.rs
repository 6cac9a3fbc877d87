use async_trait::async_trait;
use domains::{Result, User, UserRepository};
use uuid::Uuid;

use super::{collect_sorted, find_first, insert_new, replace, MemoryStore};

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        Ok(find_first(&self.users, |u| u.external_id == external_id))
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(collect_sorted(&self.users, |_| true))
    }

    async fn insert(&self, user: User) -> Result<()> {
        insert_new(&self.users, user.id, user, "User")
    }

    async fn update(&self, user: User) -> Result<()> {
        replace(&self.users, user.id, user, "User")
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.users.remove(&id);
        Ok(())
    }
}
