//! Authentication Gate
//! Mission: Turn credentials into tokens at login, and tokens into principals on every request

use crate::auth::{
    error::AuthError,
    jwt::JwtHandler,
    models::{Claims, Role},
    password::PasswordHasher,
    user_store::CredentialStore,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identity resolved from a verified session token.
///
/// Only [`AuthService::authenticate`] produces one, so holding a value means
/// authentication has already succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
    id: Uuid,
    email: String,
    role: Role,
}

impl AuthenticatedPrincipal {
    pub(crate) fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(Self {
            id,
            email: claims.email,
            role: claims.role,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: JwtHandler,
    // Verified against when the email is unknown so both failure paths cost one bcrypt run
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: JwtHandler,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash(&Uuid::new_v4().to_string())?;
        Ok(Self {
            store,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn tokens(&self) -> &JwtHandler {
        &self.tokens
    }

    /// Verify an email/password pair and issue a session token.
    ///
    /// Unknown email and wrong password both fail with
    /// [`AuthError::InvalidCredentials`]; a store outage is
    /// [`AuthError::Infrastructure`].
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let principal = self
            .store
            .find_by_email(email)
            .await
            .map_err(AuthError::Infrastructure)?;

        let Some(principal) = principal else {
            // Result ignored: the comparison only keeps timing uniform
            let _ = self.hasher.verify(password, &self.dummy_hash);
            warn!("Failed login attempt: {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &principal.password_hash)? {
            warn!("Failed login attempt: {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&principal)?;
        info!("Login successful: {} ({})", principal.id, principal.role);
        Ok(token)
    }

    /// Resolve a raw bearer token into the principal it was issued to
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedPrincipal, AuthError> {
        let claims = self.tokens.verify(token)?;
        let principal = AuthenticatedPrincipal::from_claims(claims)?;
        debug!("Authenticated {} ({})", principal.id, principal.role);
        Ok(principal)
    }
}
