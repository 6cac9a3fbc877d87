//! # Media storage
//!
//! Uploads happen in two steps: a staff member asks for a ticket, then the
//! client sends the bytes to the ticket's URL. Tickets are single use and
//! expire. Stored files are named `{uuid v7}.{ext}` where the extension comes
//! from sniffing the bytes, never from the declared content type.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use domains::{AppError, MediaStorage, Result, StorageId, StoredMedia, UploadTicket};
use mime::Mime;
use tracing::debug;
use uuid::Uuid;

/// Default lifetime of an upload ticket.
pub const DEFAULT_TICKET_TTL_SECS: i64 = 15 * 60;

/// Outstanding upload tokens and their expiry.
pub struct UploadTickets {
    ttl: Duration,
    pending: DashMap<String, DateTime<Utc>>,
}

impl UploadTickets {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            pending: DashMap::new(),
        }
    }

    pub fn issue(&self, public_base_url: &str) -> UploadTicket {
        let now = Utc::now();
        self.pending.retain(|_, expires_at| *expires_at > now);

        let token = Uuid::new_v4().simple().to_string();
        let expires_at = now + self.ttl;
        self.pending.insert(token.clone(), expires_at);
        UploadTicket {
            upload_url: format!("{}/api/uploads/{token}", public_base_url.trim_end_matches('/')),
            token,
            expires_at,
        }
    }

    /// Consumes a token. A token can be redeemed once, even when it has expired.
    pub fn redeem(&self, token: &str) -> Result<()> {
        match self.pending.remove(token) {
            Some((_, expires_at)) if expires_at > Utc::now() => Ok(()),
            Some(_) => Err(AppError::validation("Upload URL has expired")),
            None => Err(AppError::not_found("Upload URL")),
        }
    }
}

impl Default for UploadTickets {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TICKET_TTL_SECS))
    }
}

/// Checks the magic bytes and returns the real content type plus extension.
pub fn sniff_image(data: &[u8], declared: &Mime) -> Result<(Mime, &'static str)> {
    let format = image::guess_format(data)
        .map_err(|_| AppError::validation("File is not a recognized image"))?;
    let sniffed: Mime = format
        .to_mime_type()
        .parse()
        .map_err(AppError::internal)?;
    let ext = format
        .extensions_str()
        .first()
        .copied()
        .ok_or_else(|| AppError::validation("File is not a recognized image"))?;
    if sniffed != *declared {
        debug!(declared = %declared, sniffed = %sniffed, "declared content type overridden");
    }
    Ok((sniffed, ext))
}

fn new_storage_id(ext: &str) -> Result<StorageId> {
    StorageId::parse(&format!("{}.{ext}", Uuid::now_v7().simple()))
}

/// Content type implied by a stored file's extension.
pub fn content_type_of(id: &StorageId) -> Mime {
    id.extension()
        .map(|ext| mime_guess::from_ext(ext).first_or_octet_stream())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

fn media_url(public_base_url: &str, id: &StorageId) -> String {
    format!("{}/media/{id}", public_base_url.trim_end_matches('/'))
}

/// Keeps files in process memory. Used by tests and the default dev setup.
pub struct InMemoryMediaStorage {
    public_base_url: String,
    tickets: UploadTickets,
    files: DashMap<StorageId, StoredMedia>,
}

impl InMemoryMediaStorage {
    pub fn new(public_base_url: impl Into<String>, tickets: UploadTickets) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            tickets,
            files: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn issue_upload_ticket(&self) -> Result<UploadTicket> {
        Ok(self.tickets.issue(&self.public_base_url))
    }

    async fn redeem_upload(
        &self,
        token: &str,
        data: Bytes,
        content_type: &Mime,
    ) -> Result<StorageId> {
        let (sniffed, ext) = sniff_image(&data, content_type)?;
        self.tickets.redeem(token)?;
        let id = new_storage_id(ext)?;
        self.files.insert(
            id.clone(),
            StoredMedia {
                bytes: data,
                content_type: sniffed,
            },
        );
        Ok(id)
    }

    async fn url(&self, id: &StorageId) -> Result<Option<String>> {
        Ok(self
            .files
            .contains_key(id)
            .then(|| media_url(&self.public_base_url, id)))
    }

    async fn read(&self, id: &StorageId) -> Result<Option<StoredMedia>> {
        Ok(self.files.get(id).map(|m| m.clone()))
    }

    async fn delete(&self, id: &StorageId) -> Result<()> {
        self.files.remove(id);
        Ok(())
    }
}

#[cfg(feature = "media-local")]
pub use local::LocalMediaStorage;

#[cfg(feature = "media-local")]
mod local {
    use std::io::ErrorKind;
    use std::path::PathBuf;

    use tokio::fs;

    use super::*;

    /// Files on local disk, sharded two levels deep by the tail of the id.
    pub struct LocalMediaStorage {
        root: PathBuf,
        public_base_url: String,
        tickets: UploadTickets,
    }

    impl LocalMediaStorage {
        pub fn new(
            root: impl Into<PathBuf>,
            public_base_url: impl Into<String>,
            tickets: UploadTickets,
        ) -> Self {
            Self {
                root: root.into(),
                public_base_url: public_base_url.into(),
                tickets,
            }
        }

        /// `root/9e/0f/0190...9e0f.png`. The random tail of a v7 id spreads
        /// files evenly; the time-ordered head would not.
        fn sharded_path(&self, id: &StorageId) -> PathBuf {
            let stem = id.as_str().split('.').next().unwrap_or_default();
            let tail = &stem[stem.len().saturating_sub(4)..];
            let mut path = self.root.clone();
            if tail.len() == 4 {
                path.push(&tail[0..2]);
                path.push(&tail[2..4]);
            }
            path.push(id.as_str());
            path
        }
    }

    #[async_trait]
    impl MediaStorage for LocalMediaStorage {
        async fn issue_upload_ticket(&self) -> Result<UploadTicket> {
            Ok(self.tickets.issue(&self.public_base_url))
        }

        async fn redeem_upload(
            &self,
            token: &str,
            data: Bytes,
            content_type: &Mime,
        ) -> Result<StorageId> {
            let (_, ext) = sniff_image(&data, content_type)?;
            self.tickets.redeem(token)?;
            let id = new_storage_id(ext)?;

            let target = self.sharded_path(&id);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await.map_err(AppError::internal)?;
            }
            fs::write(&target, &data).await.map_err(AppError::internal)?;
            debug!(path = %target.display(), "media written");
            Ok(id)
        }

        async fn url(&self, id: &StorageId) -> Result<Option<String>> {
            let exists = fs::try_exists(self.sharded_path(id))
                .await
                .map_err(AppError::internal)?;
            Ok(exists.then(|| media_url(&self.public_base_url, id)))
        }

        async fn read(&self, id: &StorageId) -> Result<Option<StoredMedia>> {
            match fs::read(self.sharded_path(id)).await {
                Ok(bytes) => Ok(Some(StoredMedia {
                    bytes: Bytes::from(bytes),
                    content_type: content_type_of(id),
                })),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(AppError::internal(e)),
            }
        }

        async fn delete(&self, id: &StorageId) -> Result<()> {
            match fs::remove_file(self.sharded_path(id)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(AppError::internal(e)),
            }
        }
    }
}
