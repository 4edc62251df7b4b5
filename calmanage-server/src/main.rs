mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::Router;
use calmanage_core::EngineConfig;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

const DEFAULT_PORT: u16 = 4097;

#[derive(Parser)]
#[command(name = "calmanage-server")]
#[command(about = "Run calendar management commands over HTTP")]
struct Args {
    /// Port to listen on (localhost only)
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Config file (defaults to ~/.config/calmanage/config.toml)
    #[arg(short, long, env = "CALMANAGE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match args.config {
        Some(path) => EngineConfig::load_from(&path)?,
        None => EngineConfig::load()?,
    };
    let state = AppState::new(&config)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::manage::router())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!(%addr, "calmanage-server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
