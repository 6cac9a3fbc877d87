//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.
//! Repositories mirror the collections of the document store: each exposes
//! point lookups, the secondary lookups the services need, and whole-record
//! writes.

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{
    Category, Comment, Identity, Post, PostStatus, Region, Settings, StorageId, StoredMedia,
    UploadTicket, User, WebhookHeaders,
};

/// Persistence contract for users, indexed by external id.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>>;
    async fn list(&self) -> Result<Vec<User>>;
    async fn insert(&self, user: User) -> Result<()>;
    async fn update(&self, user: User) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Category>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>>;
    async fn list(&self) -> Result<Vec<Category>>;
    async fn list_active(&self) -> Result<Vec<Category>>;
    async fn insert(&self, category: Category) -> Result<()>;
    async fn update(&self, category: Category) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RegionRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Region>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Region>>;
    async fn list(&self) -> Result<Vec<Region>>;
    async fn list_active(&self) -> Result<Vec<Region>>;
    async fn insert(&self, region: Region) -> Result<()>;
    async fn update(&self, region: Region) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Post>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>>;
    async fn list(&self) -> Result<Vec<Post>>;
    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<Post>>;
    async fn any_in_category(&self, category_id: Uuid) -> Result<bool>;
    async fn any_in_region(&self, region_id: Uuid) -> Result<bool>;
    async fn insert(&self, post: Post) -> Result<()>;
    async fn update(&self, post: Post) -> Result<()>;
    /// Adds one to the view counter. Returns `false` when the post is absent.
    async fn increment_views(&self, id: Uuid) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Comment>>;
    /// Comments of a post, oldest first.
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;
    async fn insert(&self, comment: Comment) -> Result<()>;
    async fn update(&self, comment: Comment) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn delete_by_post(&self, post_id: Uuid) -> Result<()>;
}

/// The settings singleton.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<Option<Settings>>;
    /// Inserts or replaces the single settings record.
    async fn save(&self, settings: Settings) -> Result<()>;
}

/// Media storage contract for the two-step upload flow.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Issues a single-use upload URL.
    async fn issue_upload_ticket(&self) -> Result<UploadTicket>;
    /// Consumes a ticket and stores the bytes, returning their storage id.
    async fn redeem_upload(
        &self,
        token: &str,
        data: Bytes,
        content_type: &Mime,
    ) -> Result<StorageId>;
    /// Public URL of a stored file, `None` when it does not exist.
    async fn url(&self, id: &StorageId) -> Result<Option<String>>;
    async fn read(&self, id: &StorageId) -> Result<Option<StoredMedia>>;
    async fn delete(&self, id: &StorageId) -> Result<()>;
}

/// Turns a bearer token into an [`Identity`].
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait IdentityVerifier: Send + Sync {
    fn verify_bearer(&self, token: &str) -> Result<Identity>;
}

/// Checks the signature of an inbound identity-provider webhook.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait WebhookVerifier: Send + Sync {
    fn verify(&self, headers: &WebhookHeaders, body: &[u8]) -> Result<()>;
}
