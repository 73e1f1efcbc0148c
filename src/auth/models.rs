//! Authentication Models
//! Mission: Define principals, roles, token claims and the login wire format

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A stored identity as read from the credential store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: Role,
    pub created_at: String,
}

/// Authorization levels. Every principal holds exactly one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin, // Manage users and articles
    #[serde(rename = "EDITOR")]
    Editor, // Manage articles
    #[serde(rename = "READER")]
    Reader, // Read articles only
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::Reader];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Editor => "EDITOR",
            Role::Reader => "READER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "EDITOR" => Some(Role::Editor),
            "READER" => Some(Role::Reader),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // subject (principal id)
    pub email: String,
    pub role: Role,
    pub iat: i64, // issued-at, unix seconds
    pub exp: i64, // expiry, unix seconds
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Principal response (sanitized)
#[derive(Debug, Serialize, Deserialize)]
pub struct PrincipalResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl PrincipalResponse {
    pub fn from_principal(principal: &Principal) -> Self {
        Self {
            id: principal.id.to_string(),
            name: principal.name.clone(),
            email: principal.email.clone(),
            role: principal.role,
            created_at: principal.created_at.clone(),
        }
    }
}
