//! # Rusty-Press server
//!
//! Assembles the adapters chosen by configuration and compile-time features,
//! then serves the HTTP API until Ctrl-C.

use std::sync::Arc;

use anyhow::{bail, Context};
use api_adapters::{build_router, AppState, HttpOptions};
use auth_adapters::{DisabledIdentityVerifier, SvixWebhookVerifier};
use configs::{AppConfig, DatabaseBackend, LogConfig, LogFormat, MediaBackend};
use domains::{IdentityVerifier, MediaStorage, WebhookVerifier};
use secrecy::ExposeSecret;
use services::{Repositories, Services, UploadPolicy};
use storage_adapters::{Collections, InMemoryMediaStorage, MemoryStore, UploadTickets};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.log);

    let collections = open_store(&config).await?;
    let media = open_media(&config)?;
    let repos = Repositories {
        users: collections.users,
        categories: collections.categories,
        regions: collections.regions,
        posts: collections.posts,
        comments: collections.comments,
        settings: collections.settings,
        media,
    };

    let upload_policy = UploadPolicy {
        max_bytes: config.server.max_upload_bytes,
    };
    let services = Services::new(repos, upload_policy, webhook_verifier(&config)?);
    let state = AppState::new(services, identity_verifier(&config)?);

    let options = HttpOptions {
        cors_origins: config.server.cors_origins.clone(),
        body_limit: config.server.max_upload_bytes,
    };
    let app = build_router(state, &options);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "rusty-press listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;
    info!("rusty-press stopped");
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Collections> {
    match config.database.backend {
        DatabaseBackend::Memory => {
            warn!("using the in-memory store; data is lost on restart");
            Ok(Collections::from_store(Arc::new(MemoryStore::new())))
        }
        #[cfg(feature = "db-postgres")]
        DatabaseBackend::Postgres => {
            let url = config
                .database
                .url
                .as_ref()
                .context("database.url is required for the postgres backend")?;
            let store = storage_adapters::PostgresStore::connect(
                url.expose_secret(),
                config.database.max_connections,
            )
            .await
            .context("connecting to postgres")?;
            store.migrate().await.context("running migrations")?;
            Ok(Collections::from_store(Arc::new(store)))
        }
        #[cfg(not(feature = "db-postgres"))]
        DatabaseBackend::Postgres => bail!("built without the db-postgres feature"),
    }
}

fn open_media(config: &AppConfig) -> anyhow::Result<Arc<dyn MediaStorage>> {
    let tickets =
        UploadTickets::new(chrono::Duration::seconds(config.media.upload_ticket_ttl_secs));
    let base_url = config.server.public_base_url.clone();
    match config.media.backend {
        MediaBackend::Memory => Ok(Arc::new(InMemoryMediaStorage::new(base_url, tickets))),
        #[cfg(feature = "media-local")]
        MediaBackend::Local => {
            info!(root = %config.media.root_dir, "storing media on local disk");
            Ok(Arc::new(storage_adapters::LocalMediaStorage::new(
                config.media.root_dir.clone(),
                base_url,
                tickets,
            )))
        }
        #[cfg(not(feature = "media-local"))]
        MediaBackend::Local => bail!("built without the media-local feature"),
    }
}

fn identity_verifier(config: &AppConfig) -> anyhow::Result<Arc<dyn IdentityVerifier>> {
    #[cfg(feature = "auth-jwt")]
    {
        use auth_adapters::JwtIdentityVerifier;

        let issuer = config.auth.issuer.as_deref();
        if let Some(pem) = &config.auth.jwt_public_key_pem {
            let verifier = JwtIdentityVerifier::rs256_pem(pem.as_bytes(), issuer)
                .context("loading auth.jwt_public_key_pem")?;
            return Ok(Arc::new(verifier));
        }
        if let Some(secret) = &config.auth.jwt_secret {
            return Ok(Arc::new(JwtIdentityVerifier::hs256(
                secret.expose_secret().as_bytes(),
                issuer,
            )));
        }
    }
    if config.auth.jwt_public_key_pem.is_some() || config.auth.jwt_secret.is_some() {
        bail!("JWT settings present but the auth-jwt feature is disabled");
    }
    warn!("no JWT key configured; every request is anonymous");
    Ok(Arc::new(DisabledIdentityVerifier))
}

fn webhook_verifier(config: &AppConfig) -> anyhow::Result<Option<Arc<dyn WebhookVerifier>>> {
    let Some(secret) = &config.auth.webhook_secret else {
        warn!("no webhook signing secret configured; user sync webhooks will fail");
        return Ok(None);
    };
    let verifier = SvixWebhookVerifier::new(secret.expose_secret())
        .context("loading auth.webhook_secret")?
        .with_tolerance(config.auth.webhook_tolerance_secs);
    Ok(Some(Arc::new(verifier)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
