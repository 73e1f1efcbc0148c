//! Authorization Gate
//! Mission: Decide, per operation, whether an authenticated principal may proceed
//!
//! Each [`Operation`] maps to a fixed [`AccessPolicy`] through an exhaustive
//! `match`, so adding an operation without declaring its access rules does
//! not compile.

use crate::auth::{error::AuthError, models::Role, service::AuthenticatedPrincipal};
use std::fmt;

/// Whether a bearer token must be presented at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authentication {
    Required,
    Public,
}

/// Access rules declared for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub authentication: Authentication,
    /// Roles allowed to invoke the operation; empty means no role restriction
    pub roles: &'static [Role],
}

impl AccessPolicy {
    pub const fn public() -> Self {
        Self {
            authentication: Authentication::Public,
            roles: &[],
        }
    }

    pub const fn authenticated() -> Self {
        Self {
            authentication: Authentication::Required,
            roles: &[],
        }
    }

    pub const fn roles(roles: &'static [Role]) -> Self {
        Self {
            authentication: Authentication::Required,
            roles,
        }
    }

    /// A role restriction implies authentication
    pub fn requires_authentication(&self) -> bool {
        self.authentication == Authentication::Required || !self.roles.is_empty()
    }
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const EDITORIAL: &[Role] = &[Role::Editor, Role::Admin];

/// Every operation the HTTP surface exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    CurrentPrincipal,
    RegisterUser,
    ListUsers,
    GetUser,
    UpdateUser,
    DeleteUser,
    ListArticles,
    GetArticle,
    CreateArticle,
    UpdateArticle,
    DeleteArticle,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::Login,
        Operation::CurrentPrincipal,
        Operation::RegisterUser,
        Operation::ListUsers,
        Operation::GetUser,
        Operation::UpdateUser,
        Operation::DeleteUser,
        Operation::ListArticles,
        Operation::GetArticle,
        Operation::CreateArticle,
        Operation::UpdateArticle,
        Operation::DeleteArticle,
    ];

    pub const fn policy(self) -> AccessPolicy {
        match self {
            Operation::Login => AccessPolicy::public(),
            Operation::CurrentPrincipal => AccessPolicy::authenticated(),
            Operation::RegisterUser => AccessPolicy::public(),
            Operation::ListUsers => AccessPolicy::roles(ADMIN_ONLY),
            Operation::GetUser => AccessPolicy::authenticated(),
            Operation::UpdateUser => AccessPolicy::roles(ADMIN_ONLY),
            Operation::DeleteUser => AccessPolicy::roles(ADMIN_ONLY),
            Operation::ListArticles => AccessPolicy::public(),
            Operation::GetArticle => AccessPolicy::public(),
            Operation::CreateArticle => AccessPolicy::roles(EDITORIAL),
            Operation::UpdateArticle => AccessPolicy::roles(EDITORIAL),
            Operation::DeleteArticle => AccessPolicy::roles(EDITORIAL),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "auth.login",
            Operation::CurrentPrincipal => "auth.me",
            Operation::RegisterUser => "users.register",
            Operation::ListUsers => "users.list",
            Operation::GetUser => "users.get",
            Operation::UpdateUser => "users.update",
            Operation::DeleteUser => "users.delete",
            Operation::ListArticles => "articles.list",
            Operation::GetArticle => "articles.get",
            Operation::CreateArticle => "articles.create",
            Operation::UpdateArticle => "articles.update",
            Operation::DeleteArticle => "articles.delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-pass role check against a declared requirement.
///
/// An absent principal is an authentication failure, never `Forbidden`.
pub fn authorize(
    required: &[Role],
    principal: Option<&AuthenticatedPrincipal>,
) -> Result<(), AuthError> {
    if required.is_empty() {
        return Ok(());
    }

    let Some(principal) = principal else {
        return Err(AuthError::MissingToken);
    };

    if required.contains(&principal.role()) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
