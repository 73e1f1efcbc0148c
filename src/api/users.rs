//! User management endpoints

use crate::api::{ApiError, AppState};
use crate::auth::{
    models::{PrincipalResponse, Role},
    user_store::UserUpdate,
    CredentialStore, CurrentPrincipal, PasswordHasher,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Self-service registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Admin update request
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::BadRequest("Invalid email address".to_string())),
    }
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password must not be empty".to_string()));
    }
    if password.len() > PasswordHasher::MAX_PASSWORD_BYTES {
        return Err(ApiError::BadRequest(format!(
            "Password must be at most {} bytes",
            PasswordHasher::MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

/// Register - POST /api/users
/// New accounts always start as READER; only an admin can raise the role.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PrincipalResponse>), ApiError> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let password_hash = state.auth.hasher().hash(&payload.password)?;
    let user = state
        .users
        .create_user(&payload.name, &payload.email, password_hash, Role::Reader)
        .await
        .map_err(|e| ApiError::from(e).on_conflict("Email already registered"))?;

    Ok((StatusCode::CREATED, Json(PrincipalResponse::from_principal(&user))))
}

/// List users - GET /api/users (Admin only)
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PrincipalResponse>>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(users.iter().map(PrincipalResponse::from_principal).collect()))
}

/// Get user - GET /api/users/:id (any authenticated principal)
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PrincipalResponse>, ApiError> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(PrincipalResponse::from_principal(&user)))
}

/// Update user - PUT /api/users/:id (Admin only)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PrincipalResponse>, ApiError> {
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }

    let password_hash = match &payload.password {
        Some(password) => {
            validate_password(password)?;
            Some(state.auth.hasher().hash(password)?)
        }
        None => None,
    };

    let update = UserUpdate {
        name: payload.name,
        email: payload.email,
        password_hash,
        role: payload.role,
    };

    let user = state
        .users
        .update_user(id, update)
        .await
        .map_err(|e| ApiError::from(e).on_conflict("Email already registered"))?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(PrincipalResponse::from_principal(&user)))
}

/// Delete user - DELETE /api/users/:id (Admin only)
pub async fn delete(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if principal.id() == id {
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    let deleted = state
        .users
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from(e).on_conflict("User still owns articles"))?;
    if !deleted {
        return Err(ApiError::NotFound("User"));
    }

    info!("User {} deleted by {}", id, principal.id());
    Ok(StatusCode::NO_CONTENT)
}
