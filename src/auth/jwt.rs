//! JWT Token Handler
//! Mission: Issue and verify signed, time-bounded session tokens

use crate::auth::{
    error::AuthError,
    models::{Claims, Principal},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtHandler {
    pub const DEFAULT_TTL_SECS: i64 = 24 * 3600;

    /// Create a new JWT handler with secret key and token lifetime
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock in `verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for a principal, valid from now for the configured TTL
    pub fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        self.issue_at(principal, Utc::now())
    }

    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: principal.id.to_string(),
            email: principal.email.clone(),
            role: principal.role,
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        debug!(
            "Issuing JWT for principal {} ({}), expires in {}s",
            principal.id,
            principal.role,
            self.ttl.num_seconds()
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AuthError::Infrastructure(anyhow::Error::new(e).context("Failed to sign JWT"))
        })
    }

    /// Verify signature, then expiry, and return the decoded claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        // The signature is checked before the payload is deserialized
        let decoded =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!("Rejected JWT: {}", e);
                AuthError::InvalidToken
            })?;

        let claims = decoded.claims;
        if now.timestamp() >= claims.exp {
            debug!("Rejected expired JWT for subject {}", claims.sub);
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}
