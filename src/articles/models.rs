use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub author_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}
