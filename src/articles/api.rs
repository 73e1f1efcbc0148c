//! Article API Endpoints

use crate::api::{ApiError, AppState};
use crate::articles::models::{Article, CreateArticleRequest, UpdateArticleRequest};
use crate::auth::{CredentialStore, CurrentPrincipal};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

/// GET /api/articles
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.articles.list().await?))
}

/// GET /api/articles/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Article>, ApiError> {
    let article = state
        .articles
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Article"))?;
    Ok(Json(article))
}

/// POST /api/articles (EDITOR, ADMIN)
pub async fn create(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".to_string()));
    }

    // The token may outlive its principal
    let author = state
        .users
        .find_by_id(principal.id())
        .await?
        .ok_or(ApiError::NotFound("Author"))?;

    let article = state
        .articles
        .create(&payload.title, &payload.content, author.id)
        .await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// PUT /api/articles/:id (EDITOR, ADMIN)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<Json<Article>, ApiError> {
    let article = state
        .articles
        .update(id, payload)
        .await?
        .ok_or(ApiError::NotFound("Article"))?;
    Ok(Json(article))
}

/// DELETE /api/articles/:id (EDITOR, ADMIN)
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.articles.delete(id).await? {
        return Err(ApiError::NotFound("Article"));
    }
    Ok(StatusCode::NO_CONTENT)
}
