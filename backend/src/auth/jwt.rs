//! JWT token generation and validation
//!
//! Access and refresh tokens are signed with independent secrets and
//! carry different claim sets. Keys are pre-computed once at startup
//! and shared via AppState.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Account email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Display name at issue time
    pub name: String,
    /// Account email; cross-checked against the stored record on refresh
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Pre-computed key pair for one signing secret
///
/// Keys are expensive to create, so we cache them in AppState.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Token lifetime configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
}

/// JWT service for token operations
///
/// Design: Uses pre-computed keys to avoid expensive key derivation
/// on every request. Keys are wrapped in Arc for cheap cloning.
#[derive(Clone)]
pub struct JwtService {
    access_keys: JwtKeys,
    refresh_keys: JwtKeys,
    config: JwtConfig,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// # Performance Note
    /// Call this once at application startup and store in AppState.
    /// Do NOT create per-request.
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Self {
        Self {
            access_keys: JwtKeys::new(access_secret),
            refresh_keys: JwtKeys::new(refresh_secret),
            config: JwtConfig {
                access_token_expiry_secs,
                refresh_token_expiry_secs,
            },
        }
    }

    /// Issue an access token bound to a user id and email
    #[inline]
    pub fn issue_access_token(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_expiry_secs);

        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, self.access_keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }

    /// Issue a refresh token bound to a name and email
    #[inline]
    pub fn issue_refresh_token(&self, name: &str, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.refresh_token_expiry_secs);

        let claims = RefreshClaims {
            name: name.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, self.refresh_keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to generate refresh token: {}", e))
    }

    /// Validate an access token and return its claims
    ///
    /// Expired, malformed and wrongly-signed tokens all collapse into
    /// one error; call sites do not distinguish them.
    #[inline]
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        let data = decode::<AccessClaims>(token, self.access_keys.decoding(), &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid access token: {}", e))?;
        Ok(data.claims)
    }

    /// Validate a refresh token and return its claims
    #[inline]
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims> {
        let data =
            decode::<RefreshClaims>(token, self.refresh_keys.decoding(), &Validation::default())
                .map_err(|e| anyhow::anyhow!("Invalid refresh token: {}", e))?;
        Ok(data.claims)
    }

    /// Get access token expiry in seconds
    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.config.access_token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-access-secret", "test-refresh-secret", 3600, 604800)
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service.issue_access_token(user_id, "a@x.com").unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn test_issue_and_verify_refresh_token() {
        let service = create_test_service();

        let token = service.issue_refresh_token("A", "a@x.com").unwrap();
        let claims = service.verify_refresh_token(&token).unwrap();

        assert_eq!(claims.name, "A");
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn test_access_token_rejected_by_refresh_verifier() {
        let service = create_test_service();
        let token = service
            .issue_access_token(Uuid::new_v4(), "a@x.com")
            .unwrap();

        // Signed with the access secret; the refresh secret must reject it.
        assert!(service.verify_refresh_token(&token).is_err());
    }

    #[test]
    fn test_refresh_token_rejected_by_access_verifier() {
        let service = create_test_service();
        let token = service.issue_refresh_token("A", "a@x.com").unwrap();

        assert!(service.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let service = create_test_service();
        let other = JwtService::new("other-access-secret", "other-refresh-secret", 3600, 604800);

        let token = other.issue_access_token(Uuid::new_v4(), "a@x.com").unwrap();
        assert!(service.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL puts the expiry well past the default leeway.
        let service = JwtService::new("test-access-secret", "test-refresh-secret", -3600, -3600);
        let token = service
            .issue_access_token(Uuid::new_v4(), "a@x.com")
            .unwrap();

        assert!(service.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.verify_access_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let _cloned = service.clone(); // Should be cheap due to Arc
    }
}
