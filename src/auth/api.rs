//! Authentication API Endpoints
//! Mission: Provide login and current-principal endpoints

use crate::auth::{
    error::AuthError,
    middleware::CurrentPrincipal,
    models::{LoginRequest, LoginResponse},
    service::{AuthService, AuthenticatedPrincipal},
};
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(auth): State<Arc<AuthService>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    info!("Login attempt: {}", payload.email);

    let access_token = auth.login(&payload.email, &payload.password).await?;

    Ok(Json(LoginResponse { access_token }))
}

/// Get current principal - GET /api/auth/me
/// Built from the verified token alone, no store lookup
pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<AuthenticatedPrincipal> {
    Json(principal)
}
