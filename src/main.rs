use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use casting_agency::auth::TokenValidator;
use casting_agency::config::AppConfig;
use casting_agency::database::{manager, PgStore};
use casting_agency::{router, AppState};

#[derive(Parser)]
#[command(name = "casting-agency", version, about = "Casting Agency API server")]
struct Cli {
    #[arg(long, help = "Listen address (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Listen port (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Postgres URL or memory:// (overrides DATABASE_URL)")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH0_DOMAIN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("casting_agency=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!("Starting Casting Agency API in {:?} mode", config.environment);

    let validator = TokenValidator::from_config(&config.auth)?;

    let state = if config.database.is_memory() {
        tracing::warn!("Using the in-memory store; data is lost on exit");
        AppState::in_memory(validator)
    } else {
        let pool = manager::connect(&config.database)
            .await
            .context("failed to connect to the database")?;
        manager::ensure_schema(&pool).await?;
        AppState::postgres(PgStore::new(pool), validator)
    };

    let app = router(state, &config.security);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Casting Agency API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
