//! User sync from the identity provider. Responses are plain text.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use domains::{AppError, WebhookHeaders};
use tracing::{error, info};

use crate::error::ApiError;
use crate::state::AppState;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn svix_headers(headers: &HeaderMap) -> Option<WebhookHeaders> {
    Some(WebhookHeaders {
        id: header(headers, "svix-id")?,
        timestamp: header(headers, "svix-timestamp")?,
        signature: header(headers, "svix-signature")?,
    })
}

pub async fn clerk(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(svix) = svix_headers(&headers) else {
        return (StatusCode::BAD_REQUEST, "Error occurred -- no svix headers").into_response();
    };

    match state.services.webhook.verify(&svix, &body) {
        Ok(()) => {}
        Err(AppError::Internal(detail)) => {
            error!(error = %detail, "webhook cannot be verified");
            return (StatusCode::INTERNAL_SERVER_ERROR, detail).into_response();
        }
        Err(_) => return (StatusCode::BAD_REQUEST, "Error occurred").into_response(),
    }

    match state.services.webhook.ingest(&body).await {
        Ok(outcome) => {
            info!(webhook_id = %svix.id, ?outcome, "webhook processed");
            (StatusCode::OK, "Webhook processed successfully").into_response()
        }
        Err(err) => ApiError(err).into_response(),
    }
}
