//! # auth-adapters
//!
//! Identity and webhook verification against the hosted identity provider.
//!
//! - [`webhook::SvixWebhookVerifier`]: HMAC-SHA256 signatures on user-sync webhooks.
//! - `jwt::JwtIdentityVerifier` (feature `auth-jwt`): bearer session tokens.
//! - [`DisabledIdentityVerifier`]: every request is anonymous.

pub mod webhook;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtIdentityVerifier;
pub use webhook::SvixWebhookVerifier;

use domains::{AppError, Identity, IdentityVerifier, Result};

/// Used when no token verification is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledIdentityVerifier;

impl IdentityVerifier for DisabledIdentityVerifier {
    fn verify_bearer(&self, _token: &str) -> Result<Identity> {
        Err(AppError::Unauthenticated)
    }
}
