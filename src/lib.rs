//! CMS Backend Library
//!
//! Users, roles and articles over HTTP, with JWT session tokens and a
//! per-operation permission table gating every route.

pub mod api;
pub mod articles;
pub mod auth;
pub mod config;
pub mod db;
pub mod middleware;

pub use api::{router, AppState};
pub use config::AppConfig;
