//! # services
//!
//! Query and mutation handlers of Rusty-Press. Every service receives its
//! repositories as `Arc<dyn Port>` and re-derives the caller's role through
//! the [`authz::Gate`] before touching privileged data.

pub mod analytics;
pub mod authz;
pub mod categories;
pub mod comments;
pub mod media;
pub mod posts;
pub mod regions;
pub mod settings;
pub mod slug;
pub mod users;
pub mod webhook;

use std::sync::Arc;

use domains::{
    CategoryRepository, CommentRepository, MediaStorage, PostRepository, RegionRepository,
    SettingsRepository, UserRepository, WebhookVerifier,
};

pub use analytics::AnalyticsService;
pub use authz::Gate;
pub use categories::CategoryService;
pub use comments::CommentService;
pub use media::{MediaService, UploadPolicy};
pub use posts::PostService;
pub use regions::RegionService;
pub use settings::SettingsService;
pub use users::UserService;
pub use webhook::{ProviderEvent, WebhookOutcome, WebhookService};

/// The set of storage ports a deployment wires in.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub regions: Arc<dyn RegionRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub media: Arc<dyn MediaStorage>,
}

/// Every service, sharing one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub posts: PostService,
    pub categories: CategoryService,
    pub regions: RegionService,
    pub users: UserService,
    pub settings: SettingsService,
    pub comments: CommentService,
    pub media: MediaService,
    pub analytics: AnalyticsService,
    pub webhook: WebhookService,
}

impl Services {
    pub fn new(
        repos: Repositories,
        upload_policy: UploadPolicy,
        webhook_verifier: Option<Arc<dyn WebhookVerifier>>,
    ) -> Self {
        let gate = Gate::new(repos.users.clone());
        let users = UserService::new(gate.clone(), repos.users.clone());

        Self {
            posts: PostService::new(gate.clone(), &repos),
            categories: CategoryService::new(
                gate.clone(),
                repos.categories.clone(),
                repos.posts.clone(),
                repos.settings.clone(),
            ),
            regions: RegionService::new(gate.clone(), repos.regions.clone(), repos.posts.clone()),
            settings: SettingsService::new(
                gate.clone(),
                repos.settings.clone(),
                repos.categories.clone(),
            ),
            comments: CommentService::new(
                gate.clone(),
                repos.comments.clone(),
                repos.posts.clone(),
                repos.settings.clone(),
            ),
            media: MediaService::new(gate.clone(), repos.media.clone(), upload_policy),
            analytics: AnalyticsService::new(
                gate.clone(),
                repos.posts.clone(),
                repos.categories.clone(),
            ),
            webhook: WebhookService::new(users.clone(), webhook_verifier),
            users,
        }
    }
}
