//! Categories and regions share one shape: public active listings and slug
//! lookups, plus the admin CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{Category, CategoryUpdate, NewCategory, NewRegion, Region, RegionUpdate};
use uuid::Uuid;

use super::found;
use crate::error::ApiResult;
use crate::extract::MaybeIdentity;
use crate::state::AppState;

pub async fn active_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.services.categories.active().await?))
}

pub async fn category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Category>> {
    let category = state.services.categories.by_slug(&slug).await?;
    Ok(Json(found(category, "Category")?))
}

pub async fn all_categories(
    State(state): State<AppState>,
    caller: MaybeIdentity,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.services.categories.all(caller.get()).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Json(input): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state.services.categories.create(caller.get(), input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.services.categories.update(caller.get(), id, input).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.categories.delete(caller.get(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn active_regions(State(state): State<AppState>) -> ApiResult<Json<Vec<Region>>> {
    Ok(Json(state.services.regions.active().await?))
}

pub async fn region_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Region>> {
    let region = state.services.regions.by_slug(&slug).await?;
    Ok(Json(found(region, "Region")?))
}

pub async fn all_regions(
    State(state): State<AppState>,
    caller: MaybeIdentity,
) -> ApiResult<Json<Vec<Region>>> {
    Ok(Json(state.services.regions.all(caller.get()).await?))
}

pub async fn create_region(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Json(input): Json<NewRegion>,
) -> ApiResult<(StatusCode, Json<Region>)> {
    let region = state.services.regions.create(caller.get(), input).await?;
    Ok((StatusCode::CREATED, Json(region)))
}

pub async fn update_region(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
    Json(input): Json<RegionUpdate>,
) -> ApiResult<Json<Region>> {
    Ok(Json(state.services.regions.update(caller.get(), id, input).await?))
}

pub async fn delete_region(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.regions.delete(caller.get(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
