use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{
    EnrichedPost, NewPost, Post, PostListFilter, PostStatus, PostUpdate, PublishedPostsFilter,
};
use serde::Deserialize;
use uuid::Uuid;

use super::found;
use crate::error::ApiResult;
use crate::extract::MaybeIdentity;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PublishedQuery {
    pub limit: Option<usize>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminPostsQuery {
    pub status: Option<PostStatus>,
    pub author_id: Option<Uuid>,
}

pub async fn published(
    State(state): State<AppState>,
    Query(query): Query<PublishedQuery>,
) -> ApiResult<Json<Vec<EnrichedPost>>> {
    let filter = PublishedPostsFilter {
        limit: query.limit,
        category_slug: query.category,
        region_slug: query.region,
        featured: query.featured,
    };
    Ok(Json(state.services.posts.published(filter).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<EnrichedPost>>> {
    Ok(Json(state.services.posts.search(&query.q).await?))
}

pub async fn by_slug(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(slug): Path<String>,
) -> ApiResult<Json<EnrichedPost>> {
    let post = state.services.posts.by_slug(caller.get(), &slug).await?;
    Ok(Json(found(post, "Post")?))
}

pub async fn related(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<EnrichedPost>>> {
    Ok(Json(state.services.posts.related(&slug, query.limit).await?))
}

pub async fn by_id(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EnrichedPost>> {
    let post = state.services.posts.by_id(caller.get(), id).await?;
    Ok(Json(found(post, "Post")?))
}

pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.posts.increment_view_count(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_list(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Query(query): Query<AdminPostsQuery>,
) -> ApiResult<Json<Vec<EnrichedPost>>> {
    let filter = PostListFilter {
        status: query.status,
        author_id: query.author_id,
    };
    Ok(Json(state.services.posts.all(caller.get(), filter).await?))
}

pub async fn create(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Json(input): Json<NewPost>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = state.services.posts.create(caller.get(), input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
    Json(input): Json<PostUpdate>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.services.posts.update(caller.get(), id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.posts.delete(caller.get(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
