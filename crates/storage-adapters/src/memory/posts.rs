use async_trait::async_trait;
use domains::{AppError, Post, PostRepository, PostStatus, Result};
use uuid::Uuid;

use super::{collect_sorted, find_first, insert_new, MemoryStore};

#[async_trait]
impl PostRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|p| p.clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        Ok(find_first(&self.posts, |p| p.slug == slug))
    }

    async fn list(&self) -> Result<Vec<Post>> {
        Ok(collect_sorted(&self.posts, |_| true))
    }

    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<Post>> {
        Ok(collect_sorted(&self.posts, |p| p.status == status))
    }

    async fn any_in_category(&self, category_id: Uuid) -> Result<bool> {
        Ok(self.posts.iter().any(|p| p.category_id == category_id))
    }

    async fn any_in_region(&self, region_id: Uuid) -> Result<bool> {
        Ok(self.posts.iter().any(|p| p.region_id == Some(region_id)))
    }

    async fn insert(&self, post: Post) -> Result<()> {
        insert_new(&self.posts, post.id, post, "Post")
    }

    /// The stored view counter survives the update.
    async fn update(&self, post: Post) -> Result<()> {
        match self.posts.get_mut(&post.id) {
            Some(mut slot) => {
                let view_count = slot.view_count;
                *slot = Post { view_count, ..post };
                Ok(())
            }
            None => Err(AppError::not_found("Post")),
        }
    }

    async fn increment_views(&self, id: Uuid) -> Result<bool> {
        match self.posts.get_mut(&id) {
            Some(mut post) => {
                post.view_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.posts.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(slug: &str, status: PostStatus) -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::now_v7(),
            title: slug.to_uppercase(),
            slug: slug.into(),
            description: "d".into(),
            content: "c".into(),
            image_id: None,
            image_url: None,
            category_id: Uuid::nil(),
            region_id: None,
            author_id: Uuid::nil(),
            status,
            featured: false,
            view_count: 0,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn status_listing_and_view_counter() {
        let store = MemoryStore::new();
        let live = post("live", PostStatus::Published);
        let draft = post("draft", PostStatus::Draft);
        PostRepository::insert(&store, live.clone()).await.unwrap();
        PostRepository::insert(&store, draft).await.unwrap();

        let published = store.list_by_status(PostStatus::Published).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].slug, "live");

        assert!(store.increment_views(live.id).await.unwrap());
        assert!(store.increment_views(live.id).await.unwrap());
        assert!(!store.increment_views(Uuid::now_v7()).await.unwrap());
        let stored = PostRepository::get(&store, live.id).await.unwrap().unwrap();
        assert_eq!(stored.view_count, 2);
    }

    #[tokio::test]
    async fn update_of_missing_post_fails() {
        let store = MemoryStore::new();
        let err = PostRepository::update(&store, post("ghost", PostStatus::Draft))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Post not found");
    }

    #[tokio::test]
    async fn update_keeps_recorded_views() {
        let store = MemoryStore::new();
        let mut live = post("live", PostStatus::Published);
        PostRepository::insert(&store, live.clone()).await.unwrap();
        store.increment_views(live.id).await.unwrap();
        store.increment_views(live.id).await.unwrap();

        live.title = "Edited".into();
        PostRepository::update(&store, live.clone()).await.unwrap();

        let stored = PostRepository::get(&store, live.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Edited");
        assert_eq!(stored.view_count, 2);
    }

    #[tokio::test]
    async fn category_reference_check() {
        let store = MemoryStore::new();
        let mut p = post("tagged", PostStatus::Draft);
        let category_id = Uuid::now_v7();
        p.category_id = category_id;
        PostRepository::insert(&store, p).await.unwrap();
        assert!(store.any_in_category(category_id).await.unwrap());
        assert!(!store.any_in_category(Uuid::now_v7()).await.unwrap());
    }
}
