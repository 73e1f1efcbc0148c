//! Article Storage
//! Mission: Persist articles in SQLite

use crate::articles::models::{Article, UpdateArticleRequest};
use crate::db::{classify, Database};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, types::Type, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

const SELECT_ARTICLE: &str = "SELECT id, title, content, created_at, author_id FROM articles";

fn parse_uuid(idx: usize, raw: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_article(row: &Row) -> rusqlite::Result<Article> {
    Ok(Article {
        id: parse_uuid(0, row.get(0)?)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        author_id: parse_uuid(4, row.get(4)?)?,
    })
}

#[derive(Debug, Clone)]
pub struct ArticleStore {
    db: Database,
}

impl ArticleStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, title: &str, content: &str, author_id: Uuid) -> Result<Article> {
        let article = Article {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now().to_rfc3339(),
            author_id,
        };

        let row = article.clone();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO articles (id, title, content, created_at, author_id)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        row.id.to_string(),
                        row.title,
                        row.content,
                        row.created_at,
                        row.author_id.to_string(),
                    ],
                )
                .map_err(classify)?;
                Ok(())
            })
            .await?;

        info!("Created article {} by {}", article.id, article.author_id);
        Ok(article)
    }

    pub async fn list(&self) -> Result<Vec<Article>> {
        self.db
            .call(|conn| {
                let mut stmt = conn.prepare(&format!("{SELECT_ARTICLE} ORDER BY created_at DESC"))?;
                let articles = stmt
                    .query_map([], row_to_article)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Article>> {
        self.db
            .call(move |conn| {
                let article = conn
                    .query_row(
                        &format!("{SELECT_ARTICLE} WHERE id = ?1"),
                        params![id.to_string()],
                        row_to_article,
                    )
                    .optional()?;
                Ok(article)
            })
            .await
    }

    pub async fn update(&self, id: Uuid, update: UpdateArticleRequest) -> Result<Option<Article>> {
        let Some(mut article) = self.get(id).await? else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            article.title = title;
        }
        if let Some(content) = update.content {
            article.content = content;
        }

        let row = article.clone();
        let changed = self
            .db
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE articles SET title = ?2, content = ?3 WHERE id = ?1",
                    params![row.id.to_string(), row.title, row.content],
                )?;
                Ok(changed)
            })
            .await?;

        Ok((changed > 0).then_some(article))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let deleted = self
            .db
            .call(move |conn| {
                let rows =
                    conn.execute("DELETE FROM articles WHERE id = ?1", params![id.to_string()])?;
                Ok(rows > 0)
            })
            .await?;

        if deleted {
            info!("Deleted article {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{models::Role, UserStore};
    use crate::db::ConstraintViolation;
    use tempfile::NamedTempFile;

    async fn create_test_stores() -> (ArticleStore, Uuid, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::open(temp_file.path()).unwrap();
        let author = UserStore::new(db.clone())
            .create_user("Ed", "ed@example.com", "hash".to_string(), Role::Editor)
            .await
            .unwrap();
        (ArticleStore::new(db), author.id, temp_file)
    }

    #[tokio::test]
    async fn test_create_and_read_article() {
        let (store, author_id, _temp) = create_test_stores().await;

        let article = store.create("T", "C", author_id).await.unwrap();
        assert_eq!(article.title, "T");

        let found = store.get(article.id).await.unwrap().unwrap();
        assert_eq!(found, article);

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_author_rejected() {
        let (store, _author_id, _temp) = create_test_stores().await;

        let err = store.create("T", "C", Uuid::new_v4()).await.unwrap_err();
        assert!(err.downcast_ref::<ConstraintViolation>().is_some());
    }

    #[tokio::test]
    async fn test_update_and_delete_article() {
        let (store, author_id, _temp) = create_test_stores().await;
        let article = store.create("Draft", "Body", author_id).await.unwrap();

        let updated = store
            .update(
                article.id,
                UpdateArticleRequest {
                    title: Some("Final".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.content, "Body");

        assert!(store.delete(article.id).await.unwrap());
        assert!(store.get(article.id).await.unwrap().is_none());
        assert!(store
            .update(article.id, UpdateArticleRequest::default())
            .await
            .unwrap()
            .is_none());
    }
}
