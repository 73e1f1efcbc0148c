//! CMS backend server
//!
//! Usage:
//!   cms serve [--bind 0.0.0.0:3000]   # run the HTTP API
//!   cms seed                          # create the root administrator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cms_backend::{config::Environment, router, AppConfig, AppState};
use dotenv::dotenv;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cms")]
#[command(about = "Content management backend with role-gated API")]
struct Args {
    /// Path to SQLite database (overrides DATABASE_PATH)
    #[arg(long)]
    db: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Listen address (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Create the root administrator from ROOT_EMAIL / ROOT_PASSWORD
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let args = Args::parse();

    // Fails fast on a missing signing secret in production
    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(db) = args.db {
        config.database_path = db;
    }

    match args.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            serve(config).await
        }
        Commands::Seed => seed(config).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    info!("Starting CMS backend ({:?})", config.environment);
    if config.environment == Environment::Development {
        info!("Development posture: do not expose this instance publicly");
    }

    let state = AppState::from_config(&config)?;
    let app = router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn seed(config: AppConfig) -> Result<()> {
    let (email, password) = config.root_credentials()?;
    let state = AppState::from_config(&config)?;

    let created = state
        .users
        .ensure_root_admin(&email, &password, state.auth.hasher())
        .await?;
    if created {
        info!("Seed complete: root administrator {}", email);
    } else {
        info!("Seed complete: nothing to do");
    }

    Ok(())
}

/// Initialize tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cms_backend=debug,cms=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate root .env when run from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
