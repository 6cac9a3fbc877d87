use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::Identity;
use tracing::debug;

use crate::state::AppState;

/// The caller's identity, if a valid bearer token came with the request.
///
/// Missing, malformed and rejected tokens all read as anonymous; endpoints
/// that need a caller get `Unauthenticated` from the service layer.
#[derive(Debug, Clone, Default)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn get(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
        else {
            return Ok(Self(None));
        };

        match state.identity.verify_bearer(token) {
            Ok(identity) => Ok(Self(Some(identity))),
            Err(err) => {
                debug!(error = %err, "treating request as anonymous");
                Ok(Self(None))
            }
        }
    }
}
