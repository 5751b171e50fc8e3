use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use film_library::app::{routes, AppState};
use film_library::config::AppConfig;
use film_library::database::{DatabaseManager, PgRepository};

#[derive(Parser)]
#[command(name = "film-library")]
#[command(about = "Film and actor catalogue API")]
#[command(version)]
struct Cli {
    #[arg(long, env = "CONFIG_PATH", help = "YAML file merged over the environment preset")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SERVER_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("film_library=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref(), |key| std::env::var(key).ok())
        .context("failed to load configuration")?;
    tracing::info!("Starting film-library in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let listen_addr = config.listen_addr();
    let repo = Arc::new(PgRepository::new(pool.clone()));
    let state = AppState::new(config, repo)
        .context("failed to initialise token keys")?
        .with_pool(pool);
    let app = routes(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    tracing::info!("Listening on http://{}", listen_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
