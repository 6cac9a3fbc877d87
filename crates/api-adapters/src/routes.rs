use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers::{
    analytics, comments, health, media, posts, settings, taxonomy, users, webhook,
};
use crate::metrics;
use crate::state::AppState;

const REQUEST_ID: &str = "x-request-id";

/// Transport settings for the router.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub body_limit: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            body_limit: 5 * 1024 * 1024,
        }
    }
}

pub fn build_router(state: AppState, options: &HttpOptions) -> Router {
    let public = Router::new()
        .route("/api/posts", get(posts::published))
        .route("/api/posts/search", get(posts::search))
        .route("/api/posts/slug/{slug}", get(posts::by_slug))
        .route("/api/posts/slug/{slug}/related", get(posts::related))
        .route("/api/posts/{id}", get(posts::by_id))
        .route("/api/posts/{id}/views", post(posts::record_view))
        .route("/api/posts/{id}/comments", get(comments::approved).post(comments::add))
        .route("/api/categories", get(taxonomy::active_categories))
        .route("/api/categories/{slug}", get(taxonomy::category_by_slug))
        .route("/api/regions", get(taxonomy::active_regions))
        .route("/api/regions/{slug}", get(taxonomy::region_by_slug))
        .route("/api/settings", get(settings::get))
        .route("/api/me", get(users::me))
        .route("/api/uploads/{token}", post(media::upload))
        .route("/media/{id}", get(media::serve))
        .route("/clerk-webhook", post(webhook::clerk));

    let admin = Router::new()
        .route("/api/admin/posts", get(posts::admin_list).post(posts::create))
        .route("/api/admin/posts/{id}", put(posts::update).delete(posts::delete))
        .route("/api/admin/posts/{id}/comments", get(comments::all_for_post))
        .route("/api/admin/comments/{id}/approve", post(comments::approve))
        .route("/api/admin/comments/{id}", delete(comments::delete))
        .route(
            "/api/admin/categories",
            get(taxonomy::all_categories).post(taxonomy::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            put(taxonomy::update_category).delete(taxonomy::delete_category),
        )
        .route(
            "/api/admin/regions",
            get(taxonomy::all_regions).post(taxonomy::create_region),
        )
        .route(
            "/api/admin/regions/{id}",
            put(taxonomy::update_region).delete(taxonomy::delete_region),
        )
        .route("/api/admin/users", get(users::list))
        .route("/api/admin/users/{id}/role", put(users::update_role))
        .route("/api/admin/settings", put(settings::update))
        .route("/api/admin/uploads", post(media::request_upload))
        .route("/api/admin/analytics", get(analytics::dashboard));

    let request_id = HeaderName::from_static(REQUEST_ID);

    Router::new()
        .merge(public)
        .merge(admin)
        .route("/healthz", get(health::healthz))
        .route("/metrics", get(health::metrics))
        .route_layer(middleware::from_fn_with_state(state.clone(), metrics::track))
        .layer(DefaultBodyLimit::max(options.body_limit))
        .layer(CompressionLayer::new())
        .layer(cors(&options.cors_origins))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

fn cors(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}
