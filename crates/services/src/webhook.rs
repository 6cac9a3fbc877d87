//! # Identity-provider webhook ingestion
//!
//! Maps `user.created`, `user.updated` and `user.deleted` deliveries onto
//! user-record mutations. Signature checking is delegated to the configured
//! [`WebhookVerifier`].

use std::sync::Arc;

use domains::{AppError, ExternalUserProfile, Result, User, WebhookHeaders, WebhookVerifier};
use serde::Deserialize;
use tracing::{info, warn};

use crate::users::UserService;

/// A decoded lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    UserCreated(ExternalUserProfile),
    UserUpdated(ExternalUserProfile),
    UserDeleted { external_id: String },
    /// Any event type this service does not act on.
    Other(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct UserPayload {
    id: Option<String>,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
}

#[derive(Deserialize)]
struct EmailAddress {
    email_address: String,
}

impl UserPayload {
    fn external_id(&self) -> Result<String> {
        self.id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::validation("webhook payload is missing the user id"))
    }

    fn into_profile(self) -> Result<ExternalUserProfile> {
        Ok(ExternalUserProfile {
            external_id: self.external_id()?,
            email: self
                .email_addresses
                .into_iter()
                .next()
                .map(|e| e.email_address)
                .unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default(),
        })
    }
}

impl ProviderEvent {
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("malformed webhook payload: {e}")))?;

        let user = || -> Result<UserPayload> {
            serde_json::from_value(envelope.data.clone())
                .map_err(|e| AppError::validation(format!("malformed user payload: {e}")))
        };

        let kind = envelope.kind.clone();
        Ok(match kind.as_str() {
            "user.created" => ProviderEvent::UserCreated(user()?.into_profile()?),
            "user.updated" => ProviderEvent::UserUpdated(user()?.into_profile()?),
            "user.deleted" => ProviderEvent::UserDeleted {
                external_id: user()?.external_id()?,
            },
            _ => ProviderEvent::Other(kind.clone()),
        })
    }
}

/// What an ingested event did.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    Created(User),
    Updated(User),
    Deleted,
    Ignored(String),
}

#[derive(Clone)]
pub struct WebhookService {
    users: UserService,
    verifier: Option<Arc<dyn WebhookVerifier>>,
}

impl WebhookService {
    pub fn new(users: UserService, verifier: Option<Arc<dyn WebhookVerifier>>) -> Self {
        Self { users, verifier }
    }

    /// `Internal` when no signing secret is configured; the verifier's
    /// error when the signature does not check out.
    pub fn verify(&self, headers: &WebhookHeaders, body: &[u8]) -> Result<()> {
        let verifier = self
            .verifier
            .as_ref()
            .ok_or_else(|| AppError::Internal("Missing webhook signing secret".into()))?;
        verifier.verify(headers, body).inspect_err(|err| {
            warn!(webhook_id = %headers.id, error = %err, "webhook signature rejected");
        })
    }

    /// Decodes and applies a verified delivery.
    pub async fn ingest(&self, body: &[u8]) -> Result<WebhookOutcome> {
        let event = ProviderEvent::from_json(body)?;
        self.apply(event).await
    }

    pub async fn apply(&self, event: ProviderEvent) -> Result<WebhookOutcome> {
        match event {
            ProviderEvent::UserCreated(profile) => {
                Ok(WebhookOutcome::Created(self.users.create_from_provider(profile).await?))
            }
            ProviderEvent::UserUpdated(profile) => {
                Ok(WebhookOutcome::Updated(self.users.update_from_provider(profile).await?))
            }
            ProviderEvent::UserDeleted { external_id } => {
                self.users.delete_from_provider(&external_id).await?;
                Ok(WebhookOutcome::Deleted)
            }
            ProviderEvent::Other(kind) => {
                info!(event_type = %kind, "ignoring webhook event");
                Ok(WebhookOutcome::Ignored(kind))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_created_event_with_primary_email() {
        let body = br#"{
            "type": "user.created",
            "data": {
                "id": "user_2abc",
                "email_addresses": [
                    {"email_address": "first@example.com"},
                    {"email_address": "second@example.com"}
                ],
                "first_name": "Amina",
                "last_name": null,
                "image_url": "https://img.example.com/a.png"
            }
        }"#;
        let event = ProviderEvent::from_json(body).unwrap();
        assert_eq!(
            event,
            ProviderEvent::UserCreated(ExternalUserProfile {
                external_id: "user_2abc".into(),
                email: "first@example.com".into(),
                first_name: "Amina".into(),
                last_name: String::new(),
                image_url: "https://img.example.com/a.png".into(),
            })
        );
    }

    #[test]
    fn missing_email_list_yields_empty_email() {
        let body = br#"{"type":"user.updated","data":{"id":"user_1"}}"#;
        match ProviderEvent::from_json(body).unwrap() {
            ProviderEvent::UserUpdated(profile) => assert_eq!(profile.email, ""),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn decodes_deleted_and_unknown_events() {
        let deleted = br#"{"type":"user.deleted","data":{"id":"user_9","deleted":true}}"#;
        assert_eq!(
            ProviderEvent::from_json(deleted).unwrap(),
            ProviderEvent::UserDeleted {
                external_id: "user_9".into()
            }
        );

        let session = br#"{"type":"session.created","data":{"id":"sess_1"}}"#;
        assert_eq!(
            ProviderEvent::from_json(session).unwrap(),
            ProviderEvent::Other("session.created".into())
        );
    }

    #[test]
    fn rejects_user_event_without_id() {
        let body = br#"{"type":"user.created","data":{"email_addresses":[]}}"#;
        assert!(ProviderEvent::from_json(body).is_err());
    }
}
