//! Authentication Module
//! Mission: Password hashing, signed session tokens, and the two request gates

pub mod api;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod permissions;
pub mod service;
pub mod user_store;

pub use error::AuthError;
pub use jwt::JwtHandler;
pub use middleware::{enforce, CurrentPrincipal, OperationGate};
pub use models::{Principal, Role};
pub use password::PasswordHasher;
pub use permissions::{authorize, AccessPolicy, Operation};
pub use service::{AuthService, AuthenticatedPrincipal};
pub use user_store::{CredentialStore, UserStore};
