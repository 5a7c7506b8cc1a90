//! Blog server entry point.
//!
//! Loads configuration, initializes logging, connects and migrates the
//! database, then hands off to [`blog_api::run_server`].

use tracing_subscriber::{EnvFilter, fmt};

use blog_core::config::AppConfig;
use blog_core::error::AppError;
use blog_database::DatabasePool;

#[tokio::main]
async fn main() {
    let env = std::env::var("BLOG_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, &env).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig, env: &str) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), env, "Starting blog platform");

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;
    blog_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Serve ────────────────────────────────────────────
    blog_api::run_server(config, db).await
}
