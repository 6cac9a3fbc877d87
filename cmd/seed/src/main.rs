//! Seeds a Postgres database with starter categories, regions and settings.
//!
//! Set `SEED_ADMIN_EXTERNAL_ID` to promote (or pre-create) the first admin,
//! optionally with `SEED_ADMIN_EMAIL`. Existing rows are left untouched, so
//! running it twice is harmless.

use anyhow::Context;
use chrono::Utc;
use configs::AppConfig;
use domains::{
    Category, CategoryRepository, PostStatus, Region, RegionRepository, Role, Settings,
    SettingsRepository, User, UserRepository,
};
use secrecy::ExposeSecret;
use services::slug::slugify;
use storage_adapters::PostgresStore;
use tracing::info;
use uuid::Uuid;

const CATEGORIES: &[(&str, &str)] = &[
    ("Politics", "#dc2626"),
    ("Business", "#2563eb"),
    ("Technology", "#7c3aed"),
    ("Sports", "#16a34a"),
    ("Health", "#0891b2"),
    ("Culture", "#db2777"),
];

const REGIONS: &[(&str, &str)] = &[
    ("Banadir", "Somalia"),
    ("Puntland", "Somalia"),
    ("Somaliland", "Somalia"),
    ("Jubaland", "Somalia"),
    ("Nairobi", "Kenya"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = AppConfig::load().context("loading configuration")?;
    let url = config
        .database
        .url
        .as_ref()
        .context("RUSTY_PRESS__DATABASE__URL must be set")?;
    let store = PostgresStore::connect(url.expose_secret(), 2).await?;
    store.migrate().await?;

    let admin_id = seed_admin(&store).await?;
    seed_categories(&store, admin_id.unwrap_or(Uuid::nil())).await?;
    seed_regions(&store).await?;
    seed_settings(&store).await?;

    info!("seed complete");
    Ok(())
}

async fn seed_admin(store: &PostgresStore) -> anyhow::Result<Option<Uuid>> {
    let Ok(external_id) = std::env::var("SEED_ADMIN_EXTERNAL_ID") else {
        return Ok(None);
    };
    let now = Utc::now();

    if let Some(user) = store.find_by_external_id(&external_id).await? {
        let id = user.id;
        if user.role != Role::Admin {
            UserRepository::update(
                store,
                User {
                    role: Role::Admin,
                    updated_at: now,
                    ..user
                },
            )
            .await?;
            info!(user_id = %id, "promoted to admin");
        }
        return Ok(Some(id));
    }

    let user = User {
        id: Uuid::now_v7(),
        external_id,
        email: std::env::var("SEED_ADMIN_EMAIL").unwrap_or_default(),
        first_name: None,
        last_name: None,
        image_url: None,
        role: Role::Admin,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let id = user.id;
    UserRepository::insert(store, user).await?;
    info!(user_id = %id, "admin pre-created");
    Ok(Some(id))
}

async fn seed_categories(store: &PostgresStore, created_by: Uuid) -> anyhow::Result<()> {
    for (name, color) in CATEGORIES {
        let slug = slugify(name);
        if CategoryRepository::find_by_slug(store, &slug).await?.is_some() {
            continue;
        }
        let now = Utc::now();
        CategoryRepository::insert(
            store,
            Category {
                id: Uuid::now_v7(),
                name: name.to_string(),
                slug: slug.clone(),
                description: None,
                color: Some(color.to_string()),
                is_active: true,
                created_at: now,
                updated_at: now,
                created_by,
            },
        )
        .await?;
        info!(%slug, "category seeded");
    }
    Ok(())
}

async fn seed_regions(store: &PostgresStore) -> anyhow::Result<()> {
    for (name, country) in REGIONS {
        let slug = slugify(name);
        if RegionRepository::find_by_slug(store, &slug).await?.is_some() {
            continue;
        }
        let now = Utc::now();
        RegionRepository::insert(
            store,
            Region {
                id: Uuid::now_v7(),
                name: name.to_string(),
                slug: slug.clone(),
                country: country.to_string(),
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        )
        .await?;
        info!(%slug, "region seeded");
    }
    Ok(())
}

async fn seed_settings(store: &PostgresStore) -> anyhow::Result<()> {
    if SettingsRepository::get(store).await?.is_some() {
        return Ok(());
    }
    let now = Utc::now();
    store
        .save(Settings {
            id: Uuid::now_v7(),
            site_name: "Rusty-Press".into(),
            site_description: "Independent news".into(),
            contact_email: "newsroom@example.com".into(),
            timezone: "UTC".into(),
            default_category: None,
            default_post_status: PostStatus::Draft,
            allow_comments: true,
            require_moderation: false,
            created_at: now,
            updated_at: now,
        })
        .await?;
    info!("default settings seeded");
    Ok(())
}
