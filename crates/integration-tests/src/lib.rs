//! Shared fixtures: a fully wired application over the in-memory store with
//! one user of each role already synced.

use std::sync::Arc;

use auth_adapters::SvixWebhookVerifier;
use bytes::Bytes;
use chrono::Utc;
use domains::{
    Category, Identity, NewCategory, NewPost, NewRegion, Post, PostStatus, Region, Role, User,
    UserRepository, WebhookHeaders,
};
use services::{Repositories, Services, UploadPolicy};
use storage_adapters::{Collections, InMemoryMediaStorage, MemoryStore, UploadTickets};
use uuid::Uuid;

pub const JWT_SECRET: &[u8] = b"integration-test-secret";
/// base64("integration-webhook-key")
pub const WEBHOOK_SECRET: &str = "whsec_aW50ZWdyYXRpb24td2ViaG9vay1rZXk=";
pub const BASE_URL: &str = "http://press.test";

/// Smallest byte string `image::guess_format` recognises as PNG.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub media: Arc<InMemoryMediaStorage>,
    pub services: Services,
    pub admin: User,
    pub editor: User,
    pub reader: User,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(InMemoryMediaStorage::new(BASE_URL, UploadTickets::default()));
        let collections = Collections::from_store(store.clone());
        let repos = Repositories {
            users: collections.users,
            categories: collections.categories,
            regions: collections.regions,
            posts: collections.posts,
            comments: collections.comments,
            settings: collections.settings,
            media: media.clone(),
        };
        let verifier = SvixWebhookVerifier::new(WEBHOOK_SECRET).expect("webhook secret");
        let services = Services::new(repos, UploadPolicy::default(), Some(Arc::new(verifier)));

        let admin = insert_user(&store, "user_admin", Role::Admin).await;
        let editor = insert_user(&store, "user_editor", Role::Editor).await;
        let reader = insert_user(&store, "user_reader", Role::User).await;

        Self {
            store,
            media,
            services,
            admin,
            editor,
            reader,
        }
    }

    pub fn id(user: &User) -> Identity {
        Identity::new(user.external_id.clone())
    }

    pub fn admin_id(&self) -> Identity {
        Self::id(&self.admin)
    }

    pub fn editor_id(&self) -> Identity {
        Self::id(&self.editor)
    }

    pub fn reader_id(&self) -> Identity {
        Self::id(&self.reader)
    }

    pub async fn category(&self, name: &str) -> Category {
        self.services
            .categories
            .create(
                Some(&self.admin_id()),
                NewCategory {
                    name: name.into(),
                    ..NewCategory::default()
                },
            )
            .await
            .expect("create category")
    }

    pub async fn region(&self, name: &str) -> Region {
        self.services
            .regions
            .create(
                Some(&self.admin_id()),
                NewRegion {
                    name: name.into(),
                    country: "Somalia".into(),
                    ..NewRegion::default()
                },
            )
            .await
            .expect("create region")
    }

    pub async fn post_as(&self, author: &User, input: NewPost) -> Post {
        self.services
            .posts
            .create(Some(&Self::id(author)), input)
            .await
            .expect("create post")
    }

    pub async fn published_post(&self, title: &str, category: &Category) -> Post {
        self.post_as(&self.admin, new_post(title, category.id, PostStatus::Published))
            .await
    }

    /// Signs `body` the way the identity provider does.
    pub fn signed_webhook(&self, body: &[u8]) -> WebhookHeaders {
        sign_webhook(body)
    }

    pub async fn upload_png(&self) -> domains::StorageId {
        let ticket = self
            .services
            .media
            .request_upload(Some(&self.admin_id()))
            .await
            .expect("ticket");
        self.services
            .media
            .upload(&ticket.token, Bytes::from_static(PNG_BYTES), "image/png")
            .await
            .expect("upload")
    }

    #[cfg(feature = "web-axum")]
    pub fn router(&self) -> axum::Router {
        use api_adapters::{build_router, AppState, HttpOptions};
        use auth_adapters::JwtIdentityVerifier;

        let identity = Arc::new(JwtIdentityVerifier::hs256(JWT_SECRET, None));
        build_router(
            AppState::new(self.services.clone(), identity),
            &HttpOptions::default(),
        )
    }
}

pub fn new_post(title: &str, category_id: Uuid, status: PostStatus) -> NewPost {
    NewPost {
        title: title.into(),
        slug: String::new(),
        description: format!("{title} in brief"),
        content: format!("<p>{title}</p>"),
        category_id,
        region_id: None,
        image_id: None,
        status,
        featured: false,
    }
}

pub fn sign_webhook(body: &[u8]) -> WebhookHeaders {
    let verifier = SvixWebhookVerifier::new(WEBHOOK_SECRET).expect("webhook secret");
    let id = format!("msg_{}", Uuid::new_v4().simple());
    let timestamp = Utc::now().timestamp().to_string();
    let signature = verifier.sign(&id, &timestamp, body).expect("sign");
    WebhookHeaders {
        id,
        timestamp,
        signature,
    }
}

/// An HS256 session token for `subject`, valid for an hour.
pub fn bearer(subject: &str) -> String {
    let claims = serde_json::json!({
        "sub": subject,
        "exp": Utc::now().timestamp() + 3600,
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET),
    )
    .expect("encode token");
    format!("Bearer {token}")
}

pub fn user_created_event(external_id: &str, email: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "type": "user.created",
        "data": {
            "id": external_id,
            "email_addresses": [{ "email_address": email }],
            "first_name": "Amina",
            "last_name": "Warsame",
            "image_url": "https://img.example/amina.png"
        }
    }))
    .expect("serialize event")
}

async fn insert_user(store: &MemoryStore, external_id: &str, role: Role) -> User {
    let now = Utc::now();
    let user = User {
        id: Uuid::now_v7(),
        external_id: external_id.into(),
        email: format!("{external_id}@press.test"),
        first_name: Some(external_id.trim_start_matches("user_").into()),
        last_name: None,
        image_url: None,
        role,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    UserRepository::insert(store, user.clone())
        .await
        .expect("insert user");
    user
}
