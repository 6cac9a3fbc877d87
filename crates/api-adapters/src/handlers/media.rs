use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::UploadTicket;
use serde_json::{json, Value};

use super::found;
use crate::error::ApiResult;
use crate::extract::MaybeIdentity;
use crate::state::AppState;

/// Upload step one: a single-use URL for the bytes.
pub async fn request_upload(
    State(state): State<AppState>,
    caller: MaybeIdentity,
) -> ApiResult<Json<UploadTicket>> {
    Ok(Json(state.services.media.request_upload(caller.get()).await?))
}

/// Upload step two: the raw body, typed by `Content-Type`.
pub async fn upload(
    State(state): State<AppState>,
    Path(token): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let id = state.services.media.upload(&token, body, content_type).await?;
    Ok((StatusCode::CREATED, Json(json!({ "storage_id": id }))))
}

pub async fn serve(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let media = found(state.services.media.read(&id).await?, "File")?;
    let content_type = HeaderValue::from_str(media.content_type.as_ref())
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    Ok((
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, HeaderValue::from_static("public, max-age=31536000, immutable")),
        ],
        media.bytes,
    )
        .into_response())
}
