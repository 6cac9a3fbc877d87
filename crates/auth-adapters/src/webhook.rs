//! Svix-style webhook signatures.
//!
//! The signed content is `{svix-id}.{svix-timestamp}.{raw body}`. The
//! `svix-signature` header carries one or more space-separated `v1,<base64>`
//! entries; any match accepts the request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use domains::{AppError, Result, WebhookHeaders, WebhookVerifier};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Default maximum clock skew between the sender and us.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

const SECRET_PREFIX: &str = "whsec_";

pub struct SvixWebhookVerifier {
    key: Vec<u8>,
    tolerance_secs: i64,
}

impl SvixWebhookVerifier {
    /// `secret` is the dashboard value, with or without the `whsec_` prefix.
    pub fn new(secret: &str) -> Result<Self> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::internal(format!("webhook signing secret is not base64: {e}")))?;
        if key.is_empty() {
            return Err(AppError::internal("webhook signing secret is empty"));
        }
        Ok(Self {
            key,
            tolerance_secs: TIMESTAMP_TOLERANCE_SECS,
        })
    }

    pub fn with_tolerance(mut self, secs: i64) -> Self {
        self.tolerance_secs = secs;
        self
    }

    fn mac(&self, msg_id: &str, timestamp: &str, body: &[u8]) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(AppError::internal)?;
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        Ok(mac)
    }

    /// Produces a `v1,<base64>` signature entry, as the sender would.
    pub fn sign(&self, msg_id: &str, timestamp: &str, body: &[u8]) -> Result<String> {
        let digest = self.mac(msg_id, timestamp, body)?.finalize().into_bytes();
        Ok(format!("v1,{}", STANDARD.encode(digest)))
    }

    pub fn verify_at(&self, headers: &WebhookHeaders, body: &[u8], now: i64) -> Result<()> {
        let sent_at: i64 = headers
            .timestamp
            .trim()
            .parse()
            .map_err(|_| AppError::validation("Invalid webhook timestamp"))?;
        if (now - sent_at).abs() > self.tolerance_secs {
            return Err(AppError::validation("Webhook timestamp outside tolerance"));
        }

        let mac = self.mac(&headers.id, &headers.timestamp, body)?;
        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == "v1")
            .filter_map(|(_, sig)| STANDARD.decode(sig).ok())
            .any(|sig| mac.clone().verify_slice(&sig).is_ok());

        if matched {
            Ok(())
        } else {
            debug!(msg_id = %headers.id, "no webhook signature matched");
            Err(AppError::validation("Invalid webhook signature"))
        }
    }
}

impl WebhookVerifier for SvixWebhookVerifier {
    fn verify(&self, headers: &WebhookHeaders, body: &[u8]) -> Result<()> {
        self.verify_at(headers, body, Utc::now().timestamp())
    }
}
