use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kvp_api::config::ServerConfig;
use kvp_api::mailer::{ContactMailer, ContactNotifier, MailConfig};
use kvp_api::router::build_app_router;
use kvp_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kvp_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = kvp_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    kvp_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    kvp_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Mailer ---
    let mailer = MailConfig::from_env()
        .map(|cfg| Arc::new(ContactMailer::new(cfg)) as Arc<dyn ContactNotifier>);
    if mailer.is_none() {
        tracing::warn!("SMTP_HOST not set; contact notifications are disabled");
    }

    // --- Router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer,
    };
    let app = build_app_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid bind address")?;
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
