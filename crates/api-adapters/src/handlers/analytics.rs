use axum::extract::State;
use axum::Json;
use domains::DashboardStats;

use crate::error::ApiResult;
use crate::extract::MaybeIdentity;
use crate::state::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
    caller: MaybeIdentity,
) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.services.analytics.dashboard(caller.get()).await?))
}
