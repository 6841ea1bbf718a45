use clap::Parser;
use quanqua::{ProviderConfig, TranslationProxy};
use quanqua_web::{AppState, router};
use std::net::SocketAddr;
use tracing::{info, warn};

/// Translation proxy server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "QUANQUA_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file when present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let config = ProviderConfig::from_env();
    if !config.is_configured() {
        warn!(
            "{} is not set; every translation request will fail",
            quanqua::config::API_KEY_VAR
        );
    }
    let proxy = TranslationProxy::from_config(&config)
        .map_err(|e| format!("Failed to initialize translator: {}", e))?;

    info!(?proxy, endpoint = %config.endpoint, "Starting Quanqua translation proxy");

    let app = router(AppState::new(proxy));

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("Server running at http://{}", args.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
