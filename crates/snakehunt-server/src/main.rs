//! Binary entrypoint for the snakehunt HTTP server.
//!
//! Configuration comes from `SNAKEHUNT_*` environment variables (see
//! [`ServerConfig::from_env`]); log filtering from `RUST_LOG`.

use tracing_subscriber::EnvFilter;

use snakehunt_server::config::ServerConfig;
use snakehunt_server::router::build_router;
use snakehunt_server::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    if config.jwt_secret_generated {
        tracing::warn!("SNAKEHUNT_JWT_SECRET not set; tokens will not survive a restart");
    }

    let state = AppState::new(&config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(db = %config.db_path, "snakehunt server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
