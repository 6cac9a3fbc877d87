//! # storage-adapters
//!
//! Implementations of the `domains` persistence and media ports.
//!
//! - [`memory`]: a `DashMap`-backed document store, one map per collection.
//! - `postgres` (feature `db-postgres`): the same collections as tables.
//! - [`media`]: upload tickets plus in-memory and local-filesystem media stores.

pub mod media;
pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use media::{InMemoryMediaStorage, UploadTickets};
pub use memory::MemoryStore;

#[cfg(feature = "media-local")]
pub use media::LocalMediaStorage;

#[cfg(feature = "db-postgres")]
pub use postgres::PostgresStore;

use std::sync::Arc;

use domains::{
    CategoryRepository, CommentRepository, PostRepository, RegionRepository, SettingsRepository,
    UserRepository,
};

/// One handle per collection, as trait objects, ready for `services::Repositories`.
pub struct Collections {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub regions: Arc<dyn RegionRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Collections {
    /// Every collection served by the same store instance.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + CategoryRepository
            + RegionRepository
            + PostRepository
            + CommentRepository
            + SettingsRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            categories: store.clone(),
            regions: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            settings: store,
        }
    }
}
