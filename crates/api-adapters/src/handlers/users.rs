use axum::extract::{Path, State};
use axum::Json;
use domains::{Role, User};
use serde::Deserialize;
use uuid::Uuid;

use super::found;
use crate::error::ApiResult;
use crate::extract::MaybeIdentity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

/// The caller's own record. Signed-in callers whose record has not been
/// synced yet get a 404.
pub async fn me(State(state): State<AppState>, caller: MaybeIdentity) -> ApiResult<Json<User>> {
    let user = state.services.users.current(caller.get()).await?;
    Ok(Json(found(user, "User")?))
}

pub async fn list(
    State(state): State<AppState>,
    caller: MaybeIdentity,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.list(caller.get()).await?))
}

pub async fn update_role(
    State(state): State<AppState>,
    caller: MaybeIdentity,
    Path(id): Path<Uuid>,
    Json(change): Json<RoleChange>,
) -> ApiResult<Json<User>> {
    Ok(Json(
        state.services.users.update_role(caller.get(), id, change.role).await?,
    ))
}
