use tracing_subscriber::EnvFilter;

use foerderzeit::database::DatabaseManager;
use foerderzeit::{config, is_production, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();
    let default_filter = if config.api.enable_request_logging {
        "foerderzeit=info,tower_http=debug"
    } else {
        "foerderzeit=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    tracing::info!("Starting foerderzeit in {:?} mode", config.environment);
    if is_production!() && config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set in production");
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, routes::app())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    DatabaseManager::close_all().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
