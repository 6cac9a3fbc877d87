pub mod analytics;
pub mod comments;
pub mod health;
pub mod media;
pub mod posts;
pub mod settings;
pub mod taxonomy;
pub mod users;
pub mod webhook;

use domains::AppError;

use crate::error::ApiResult;

/// `None` from a lookup becomes a 404 for `entity`.
pub(crate) fn found<T>(value: Option<T>, entity: &str) -> ApiResult<T> {
    value.ok_or_else(|| AppError::not_found(entity).into())
}
