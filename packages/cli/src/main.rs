// ABOUTME: Curbside server binary
// ABOUTME: Parses CLI args, loads env config, and serves the licensing API

use std::net::SocketAddr;

use axum::http::Method;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use curbside_api::DbState;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "curbside", about = "Food-truck vendor licensing platform")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => serve().await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    info!("Starting Curbside server on port {}", config.port);
    info!("Database: {}", config.database_path.display());

    let state = DbState::init_with_path(Some(config.database_path.clone())).await?;

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = curbside_api::create_api_router(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
