use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{Comment, NewComment};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::MaybeIdentity;
use crate::state::AppState;

pub async fn approved(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(state.services.comments.approved_for_post(post_id).await?))
}

pub async fn add(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(post_id): Path<Uuid>,
    Json(input): Json<NewComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state.services.comments.add(caller.get(), post_id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn all_for_post(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(state.services.comments.all_for_post(caller.get(), post_id).await?))
}

pub async fn approve(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Comment>> {
    Ok(Json(state.services.comments.approve(caller.get(), id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.comments.delete(caller.get(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
