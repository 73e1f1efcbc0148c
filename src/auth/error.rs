//! Auth error taxonomy and its HTTP mapping.
//!
//! Every unauthenticated variant renders as 401, `Forbidden` as 403, an
//! overlong password as 400, and internal failures as a generic 500.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("insufficient permissions")]
    Forbidden,

    #[error("password hashing failed: {0}")]
    HashingFailure(#[from] bcrypt::BcryptError),

    #[error("password exceeds {} bytes", crate::auth::PasswordHasher::MAX_PASSWORD_BYTES)]
    PasswordTooLong,

    #[error("internal auth failure: {0:#}")]
    Infrastructure(anyhow::Error),
}

impl AuthError {
    /// True for the kinds that mean "caller must (re-)authenticate".
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::InvalidCredentials
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            _ if self.is_unauthenticated() => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::PasswordTooLong => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AuthError::MissingToken => ("unauthenticated", "Missing authorization token"),
            AuthError::InvalidToken | AuthError::TokenExpired => {
                ("unauthenticated", "Invalid or expired token")
            }
            AuthError::InvalidCredentials => ("unauthenticated", "Invalid email or password"),
            AuthError::Forbidden => ("forbidden", "Insufficient permissions"),
            AuthError::PasswordTooLong => ("bad_request", "Password must be at most 72 bytes"),
            AuthError::HashingFailure(_) | AuthError::Infrastructure(_) => {
                error!(error = %self, "Auth request failed");
                ("internal_error", "Internal server error")
            }
        };

        let status = self.status();
        let body = Json(json!({ "error": code, "message": message }));

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_statuses() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::TokenExpired,
            AuthError::InvalidCredentials,
        ] {
            assert!(err.is_unauthenticated());
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }

        let forbidden = AuthError::Forbidden;
        assert!(!forbidden.is_unauthenticated());
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

        let infra = AuthError::Infrastructure(anyhow::anyhow!("disk I/O error"));
        assert_eq!(
            infra.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let hashing = AuthError::HashingFailure(bcrypt::BcryptError::InvalidHash(
            "garbage".to_string(),
        ));
        assert_eq!(
            hashing.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_failure_message_names_cause() {
        let err = AuthError::Infrastructure(
            anyhow::anyhow!("bad key").context("Failed to sign JWT"),
        );
        let message = err.to_string();
        assert!(message.contains("Failed to sign JWT"));
        assert!(!message.contains("credential store"));
    }

    #[test]
    fn test_password_too_long_is_bad_request() {
        let response = AuthError::PasswordTooLong.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_unauthenticated_carries_bearer_challenge() {
        let response = AuthError::TokenExpired.into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let response = AuthError::Forbidden.into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
