//! Application configuration
//!
//! Read once at startup and shared read-only for the life of the process.

use anyhow::{bail, Context, Result};
use chrono::Duration;
use std::env;
use tracing::warn;

/// Documented development-only signing secret. Never used in production.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";
pub const DEV_ROOT_EMAIL: &str = "root@example.com";
pub const DEV_ROOT_PASSWORD: &str = "rootpass";
const MIN_PRODUCTION_SECRET_LEN: usize = 32;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            other => bail!("APP_ENV must be 'production' or 'development', got '{other}'"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub database_path: String,
    pub bind_addr: String,
    pub root_email: Option<String>,
    pub root_password: Option<String>,
}

// Hand-written so the secret and root password never reach a log line
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("environment", &self.environment)
            .field("token_ttl_secs", &self.token_ttl.num_seconds())
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("database_path", &self.database_path)
            .field("bind_addr", &self.bind_addr)
            .field("root_email", &self.root_email)
            .finish_non_exhaustive()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{name} has invalid value '{v}'")),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Fails fast on a missing or
    /// weak signing secret in production.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)?,
            None => Environment::Development,
        };

        let jwt_secret = match (lookup("JWT_SECRET").filter(|s| !s.is_empty()), environment) {
            (Some(secret), Environment::Production)
                if secret.len() < MIN_PRODUCTION_SECRET_LEN =>
            {
                bail!("JWT_SECRET must be at least {MIN_PRODUCTION_SECRET_LEN} bytes in production")
            }
            (Some(secret), _) => secret,
            (None, Environment::Production) => {
                bail!("JWT_SECRET is required when APP_ENV=production")
            }
            (None, Environment::Development) => {
                warn!("JWT_SECRET not set; using the development secret. Do not deploy like this.");
                DEV_JWT_SECRET.to_string()
            }
        };

        let ttl_secs: i64 = parse_var("TOKEN_TTL_SECS", lookup("TOKEN_TTL_SECS"), 24 * 3600)?;
        if ttl_secs <= 0 {
            bail!("TOKEN_TTL_SECS must be positive");
        }

        let bcrypt_cost: u32 = parse_var(
            "BCRYPT_COST",
            lookup("BCRYPT_COST"),
            crate::auth::PasswordHasher::DEFAULT_COST,
        )?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}");
        }

        let database_path = lookup("DATABASE_PATH").unwrap_or_else(|| "./cms.db".to_string());
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        Ok(Self {
            environment,
            jwt_secret,
            token_ttl: Duration::seconds(ttl_secs),
            bcrypt_cost,
            database_path,
            bind_addr,
            root_email: lookup("ROOT_EMAIL"),
            root_password: lookup("ROOT_PASSWORD"),
        })
    }

    /// Credentials for the seed administrator. Development falls back to the
    /// documented defaults; production requires both to be set.
    pub fn root_credentials(&self) -> Result<(String, String)> {
        match (&self.root_email, &self.root_password, self.environment) {
            (Some(email), Some(password), _) => Ok((email.clone(), password.clone())),
            (_, _, Environment::Production) => {
                bail!("ROOT_EMAIL and ROOT_PASSWORD are required when APP_ENV=production")
            }
            (email, password, Environment::Development) => Ok((
                email.clone().unwrap_or_else(|| DEV_ROOT_EMAIL.to_string()),
                password
                    .clone()
                    .unwrap_or_else(|| DEV_ROOT_PASSWORD.to_string()),
            )),
        }
    }
}
