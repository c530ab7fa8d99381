//! # textrace-api — Binary Entry Point
//!
//! Reads configuration from the environment, builds the single ledger and
//! batch registry, and serves the Axum application.
//!
//! - `PORT`: listen port (default 5000)
//! - `AUTH_TOKEN`: bearer token for batch routes (unset disables auth)
//! - `RUST_LOG`: tracing filter (default `info`)
//! - `LOG_FORMAT=json`: emit JSON log lines

use textrace_api::state::{AppConfig, AppState};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("invalid configuration: {e}");
        e
    })?;
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set; batch routes are unauthenticated");
    }

    let port = config.port;
    let app = textrace_api::app(AppState::with_config(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("textrace API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
