//! Admin session tokens.
//!
//! A single admin identity logs in with a username and password and receives
//! an HS256-signed JWT that expires after a short, fixed lifetime. Expiry is
//! the only way a token stops being valid.

use crate::error::ApiError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Checks a username/password pair.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// One fixed credential pair. Only a SHA-256 hash of the password is kept.
pub struct StaticCredentials {
    username: String,
    password_hash: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: &SecretString) -> Self {
        Self {
            username: username.into(),
            password_hash: hash_secret(password.expose_secret()),
        }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && hash_secret(password) == self.password_hash
    }
}

/// Hash a secret using SHA-256.
pub fn hash_secret(secret: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub username: String,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// Issues and verifies admin tokens.
pub struct AdminSessions {
    verifier: Arc<dyn CredentialVerifier>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl AdminSessions {
    /// Create a session service signing with `secret`.
    pub fn new(verifier: Arc<dyn CredentialVerifier>, secret: &SecretString, ttl: Duration) -> Self {
        let secret = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            verifier,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Check credentials and issue a token on success.
    pub fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        if !self.verifier.verify(username, password) {
            warn!(username = %username, "Admin login rejected");
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.issue_at(username, chrono::Utc::now().timestamp())?;
        info!(username = %username, ttl = ?self.ttl, "Admin token issued");
        Ok(token)
    }

    /// Sign a token for `username` as if issued at `issued_at` (Unix seconds).
    pub fn issue_at(&self, username: &str, issued_at: i64) -> Result<String, ApiError> {
        let claims = AdminClaims {
            username: username.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl.as_secs() as i64,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(ApiError::from)
    }

    /// Validate signature and expiry, returning the claims.
    pub fn verify_token(&self, token: &str) -> Result<AdminClaims, ApiError> {
        let data = jsonwebtoken::decode::<AdminClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                warn!("Admin token rejected: {}", e);
                ApiError::from(e)
            })?;

        // The decoder still accepts a token during its `exp` second
        if data.claims.exp <= chrono::Utc::now().timestamp() {
            warn!("Admin token rejected: expired");
            return Err(ApiError::InvalidToken("jwt expired".to_string()));
        }

        Ok(data.claims)
    }
}
