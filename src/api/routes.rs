//! Router composition.
//!
//! Every route is wrapped in an [`OperationGate`] for its [`Operation`], so
//! the access rules live in one table rather than in the handlers.

use crate::api::{users, AppState};
use crate::articles::api as articles;
use crate::auth::{api as auth_api, enforce, Operation, OperationGate};
use crate::middleware::request_logging;
use axum::{
    middleware,
    routing::{delete, get, post, put, MethodRouter},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let gated = |op: Operation, route: MethodRouter<AppState>| {
        route.route_layer(middleware::from_fn_with_state(
            OperationGate::new(state.auth.clone(), op),
            enforce,
        ))
    };

    let api = Router::new()
        .route(
            "/api/auth/login",
            gated(Operation::Login, post(auth_api::login)),
        )
        .route(
            "/api/auth/me",
            gated(Operation::CurrentPrincipal, get(auth_api::me)),
        )
        .route(
            "/api/users",
            gated(Operation::RegisterUser, post(users::register))
                .merge(gated(Operation::ListUsers, get(users::list))),
        )
        .route(
            "/api/users/:id",
            gated(Operation::GetUser, get(users::get))
                .merge(gated(Operation::UpdateUser, put(users::update)))
                .merge(gated(Operation::DeleteUser, delete(users::delete))),
        )
        .route(
            "/api/articles",
            gated(Operation::ListArticles, get(articles::list))
                .merge(gated(Operation::CreateArticle, post(articles::create))),
        )
        .route(
            "/api/articles/:id",
            gated(Operation::GetArticle, get(articles::get))
                .merge(gated(Operation::UpdateArticle, put(articles::update)))
                .merge(gated(Operation::DeleteArticle, delete(articles::delete))),
        );

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
