//! Comments and the settings singleton.

use async_trait::async_trait;
use domains::{Comment, CommentRepository, Result, Settings, SettingsRepository};
use uuid::Uuid;

use super::{collect_sorted, insert_new, replace, MemoryStore};

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.clone()))
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        Ok(collect_sorted(&self.comments, |c| c.post_id == post_id))
    }

    async fn insert(&self, comment: Comment) -> Result<()> {
        insert_new(&self.comments, comment.id, comment, "Comment")
    }

    async fn update(&self, comment: Comment) -> Result<()> {
        replace(&self.comments, comment.id, comment, "Comment")
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.comments.remove(&id);
        Ok(())
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<()> {
        self.comments.retain(|_, c| c.post_id != post_id);
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn get(&self) -> Result<Option<Settings>> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: Settings) -> Result<()> {
        *self.settings.write().await = Some(settings);
        Ok(())
    }
}
