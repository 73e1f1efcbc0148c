//! User Storage
//! Mission: Look up principals for authentication and persist user accounts

use crate::auth::{
    models::{Principal, Role},
    password::PasswordHasher,
};
use crate::db::{classify, Database};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, types::Type, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

/// Read-only principal lookups consumed by the authentication gate
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>>;
}

/// Fields to change on an existing user; `None` leaves a field untouched
#[derive(Debug, Default, Clone)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

const SELECT_USER: &str = "SELECT id, name, email, password_hash, role, created_at FROM users";

fn row_to_principal(row: &Row) -> rusqlite::Result<Principal> {
    let id: String = row.get(0)?;
    let role: String = row.get(4)?;
    Ok(Principal {
        id: Uuid::parse_str(&id)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: Role::parse(&role).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("unknown role {role}").into(),
            )
        })?,
        created_at: row.get(5)?,
    })
}

/// User storage with SQLite backend
#[derive(Debug, Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new user from an already-hashed password.
    /// A taken email surfaces as [`crate::db::ConstraintViolation`].
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: String,
        role: Role,
    ) -> Result<Principal> {
        let user = Principal {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now().to_rfc3339(),
        };

        let row = user.clone();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, name, email, password_hash, role, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        row.id.to_string(),
                        row.name,
                        row.email,
                        row.password_hash,
                        row.role.as_str(),
                        row.created_at,
                    ],
                )
                .map_err(classify)?;
                Ok(())
            })
            .await?;

        info!("Created user {} ({})", user.id, user.role);
        Ok(user)
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<Principal>> {
        self.db
            .call(|conn| {
                let mut stmt = conn.prepare(&format!("{SELECT_USER} ORDER BY created_at"))?;
                let users = stmt
                    .query_map([], row_to_principal)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(users)
            })
            .await
    }

    /// Apply an update, returning the stored result or `None` if no such user
    pub async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<Option<Principal>> {
        let Some(mut user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = update.role {
            user.role = role;
        }

        let row = user.clone();
        let changed = self
            .db
            .call(move |conn| {
                let changed = conn
                    .execute(
                        "UPDATE users SET name = ?2, email = ?3, password_hash = ?4, role = ?5
                         WHERE id = ?1",
                        params![
                            row.id.to_string(),
                            row.name,
                            row.email,
                            row.password_hash,
                            row.role.as_str(),
                        ],
                    )
                    .map_err(classify)?;
                Ok(changed)
            })
            .await?;

        if changed == 0 {
            return Ok(None);
        }

        info!("Updated user {} ({})", user.id, user.role);
        Ok(Some(user))
    }

    /// Delete a user by ID. Returns false if the user did not exist.
    pub async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let deleted = self
            .db
            .call(move |conn| {
                let rows = conn
                    .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])
                    .map_err(classify)?;
                Ok(rows > 0)
            })
            .await?;

        if deleted {
            info!("Deleted user {}", id);
        }
        Ok(deleted)
    }

    /// Create the root administrator unless that email is already registered.
    /// Returns true when a user was created.
    pub async fn ensure_root_admin(
        &self,
        email: &str,
        password: &str,
        hasher: &PasswordHasher,
    ) -> Result<bool> {
        if password.len() > PasswordHasher::MAX_PASSWORD_BYTES {
            bail!(
                "ROOT_PASSWORD must be at most {} bytes",
                PasswordHasher::MAX_PASSWORD_BYTES
            );
        }
        if self.find_by_email(email).await?.is_some() {
            info!("Root user already exists");
            return Ok(false);
        }

        let password_hash = hasher.hash(password)?;
        self.create_user("root", email, password_hash, Role::Admin)
            .await?;
        info!("Created root user {}", email);
        Ok(true)
    }
}

#[async_trait]
impl CredentialStore for UserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>> {
        let email = email.to_string();
        self.db
            .call(move |conn| {
                let user = conn
                    .query_row(
                        &format!("{SELECT_USER} WHERE email = ?1"),
                        params![email],
                        row_to_principal,
                    )
                    .optional()?;
                Ok(user)
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>> {
        self.db
            .call(move |conn| {
                let user = conn
                    .query_row(
                        &format!("{SELECT_USER} WHERE id = ?1"),
                        params![id.to_string()],
                        row_to_principal,
                    )
                    .optional()?;
                Ok(user)
            })
            .await
    }
}
