//! HTTP surface: shared state, router composition, and user endpoints

pub mod error;
pub mod routes;
pub mod users;

pub use error::ApiError;
pub use routes::router;

use crate::articles::ArticleStore;
use crate::auth::{AuthService, JwtHandler, PasswordHasher, UserStore};
use crate::config::AppConfig;
use crate::db::Database;
use anyhow::{Context, Result};
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared across all requests. Everything in it is
/// immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserStore>,
    pub articles: Arc<ArticleStore>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let db = Database::open(&config.database_path)?;
        let users = Arc::new(UserStore::new(db.clone()));
        let articles = Arc::new(ArticleStore::new(db));

        let auth = AuthService::new(
            users.clone(),
            PasswordHasher::new(config.bcrypt_cost),
            JwtHandler::new(&config.jwt_secret, config.token_ttl),
        )
        .context("Failed to initialise authentication")?;

        Ok(Self {
            auth: Arc::new(auth),
            users,
            articles,
        })
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
