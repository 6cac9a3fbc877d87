//! Two-step uploads: staff request a ticket, then send the bytes to it.

use std::sync::Arc;

use bytes::Bytes;
use domains::{AppError, Identity, MediaStorage, Result, Role, StorageId, StoredMedia, UploadTicket};
use tracing::info;

use crate::authz::Gate;

/// Limits applied before bytes reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Clone)]
pub struct MediaService {
    gate: Gate,
    media: Arc<dyn MediaStorage>,
    policy: UploadPolicy,
}

impl MediaService {
    pub fn new(gate: Gate, media: Arc<dyn MediaStorage>, policy: UploadPolicy) -> Self {
        Self { gate, media, policy }
    }

    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    pub async fn request_upload(&self, identity: Option<&Identity>) -> Result<UploadTicket> {
        let user = self
            .gate
            .require(identity, Role::STAFF, "Only admins and editors can upload files")
            .await?;
        let ticket = self.media.issue_upload_ticket().await?;
        info!(user_id = %user.id, expires_at = %ticket.expires_at, "upload ticket issued");
        Ok(ticket)
    }

    /// The ticket token is the credential; no identity is required here.
    pub async fn upload(&self, token: &str, data: Bytes, content_type: &str) -> Result<StorageId> {
        let mime: mime::Mime = content_type
            .parse()
            .map_err(|_| AppError::validation(format!("invalid content type '{content_type}'")))?;
        if mime.type_() != mime::IMAGE {
            return Err(AppError::validation("Only image uploads are supported"));
        }
        if data.is_empty() {
            return Err(AppError::validation("Upload is empty"));
        }
        if data.len() > self.policy.max_bytes {
            return Err(AppError::validation(format!(
                "Upload exceeds the {} byte limit",
                self.policy.max_bytes
            )));
        }

        let size = data.len();
        let id = self.media.redeem_upload(token, data, &mime).await?;
        info!(storage_id = %id, size, "upload stored");
        Ok(id)
    }

    /// Unknown or malformed ids read as absent.
    pub async fn read(&self, raw_id: &str) -> Result<Option<StoredMedia>> {
        match StorageId::parse(raw_id) {
            Ok(id) => self.media.read(&id).await,
            Err(_) => Ok(None),
        }
    }
}
