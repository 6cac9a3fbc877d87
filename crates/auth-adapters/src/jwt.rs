//! Bearer session tokens issued by the identity provider.
//! The `sub` claim becomes the caller's external id.

use domains::{AppError, Identity, IdentityVerifier, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
}

pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Shared-secret tokens, mostly for development and tests.
    pub fn hs256(secret: &[u8], issuer: Option<&str>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
            validation: validation(Algorithm::HS256, issuer),
        }
    }

    /// Tokens signed with the provider's RSA key, given its PEM public key.
    pub fn rs256_pem(pem: &[u8], issuer: Option<&str>) -> Result<Self> {
        let key = DecodingKey::from_rsa_pem(pem)
            .map_err(|e| AppError::internal(format!("invalid JWT public key: {e}")))?;
        Ok(Self {
            key,
            validation: validation(Algorithm::RS256, issuer),
        })
    }
}

fn validation(alg: Algorithm, issuer: Option<&str>) -> Validation {
    let mut validation = Validation::new(alg);
    validation.leeway = 5;
    validation.validate_aud = false;
    if let Some(iss) = issuer {
        validation.set_issuer(&[iss]);
    }
    validation
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn verify_bearer(&self, token: &str) -> Result<Identity> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "bearer token rejected");
            AppError::Unauthenticated
        })?;
        if data.claims.sub.is_empty() {
            return Err(AppError::Unauthenticated);
        }
        Ok(Identity::new(data.claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"dev-secret";

    fn token(claims: serde_json::Value) -> String {
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn in_an_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn subject_becomes_identity() {
        let v = JwtIdentityVerifier::hs256(SECRET, None);
        let identity = v
            .verify_bearer(&token(json!({"sub": "user_2x", "exp": in_an_hour()})))
            .unwrap();
        assert_eq!(identity.subject, "user_2x");
    }

    #[test]
    fn expired_and_foreign_tokens_are_unauthenticated() {
        let v = JwtIdentityVerifier::hs256(SECRET, None);
        let expired = token(json!({"sub": "user_2x", "exp": 1_000}));
        assert_eq!(v.verify_bearer(&expired), Err(AppError::Unauthenticated));

        let other = JwtIdentityVerifier::hs256(b"another-secret", None);
        let valid = token(json!({"sub": "user_2x", "exp": in_an_hour()}));
        assert_eq!(other.verify_bearer(&valid), Err(AppError::Unauthenticated));
    }

    #[test]
    fn issuer_is_enforced_when_configured() {
        let v = JwtIdentityVerifier::hs256(SECRET, Some("https://clerk.example.com"));
        let wrong = token(json!({"sub": "u", "exp": in_an_hour(), "iss": "https://evil.example"}));
        assert!(v.verify_bearer(&wrong).is_err());
        let right = token(json!({
            "sub": "u",
            "exp": in_an_hour(),
            "iss": "https://clerk.example.com"
        }));
        assert!(v.verify_bearer(&right).is_ok());
    }

    #[test]
    fn malformed_public_key_is_a_config_error() {
        let pem = b"-----BEGIN PUBLIC KEY-----\nnot base64 at all\n-----END PUBLIC KEY-----\n";
        let err = JwtIdentityVerifier::rs256_pem(pem, None).err().unwrap();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err.to_string().contains("invalid JWT public key"));
    }
}
