use axum::extract::State;
use axum::Json;
use domains::{Settings, SettingsUpdate};

use crate::error::ApiResult;
use crate::extract::MaybeIdentity;
use crate::state::AppState;

/// `null` until an admin saves settings for the first time.
pub async fn get(State(state): State<AppState>) -> ApiResult<Json<Option<Settings>>> {
    Ok(Json(state.services.settings.get().await?))
}

pub async fn update(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Json(input): Json<SettingsUpdate>,
) -> ApiResult<Json<Settings>> {
    Ok(Json(state.services.settings.update(caller.get(), input).await?))
}
