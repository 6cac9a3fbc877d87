use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Opaque reference to a stored binary, e.g. `0190f5c2a1b27c3d8e4f5a6b7c8d9e0f.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageId(String);

impl StorageId {
    /// Accepts lowercase alphanumerics with at most one `.` separating an
    /// extension, so ids can never escape a storage directory.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let valid = !raw.is_empty()
            && raw.len() <= 64
            && raw.matches('.').count() <= 1
            && !raw.starts_with('.')
            && !raw.ends_with('.')
            && raw
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::validation(format!("invalid storage id '{raw}'")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn extension(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, ext)| ext)
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Step one of an upload: a single-use URL the client sends the bytes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTicket {
    pub token: String,
    pub upload_url: String,
    pub expires_at: DateTime<Utc>,
}

/// A stored binary read back for serving.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMedia {
    pub bytes: bytes::Bytes,
    pub content_type: mime::Mime,
}
