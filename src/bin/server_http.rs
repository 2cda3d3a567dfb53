//! Grid Duel game server (HTTP transport).

use anyhow::Result;
use clap::Parser;
use grid_duel::{SessionConfig, SessionHandle, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Authoritative two-player tic-tac-toe server.
#[derive(Debug, Parser)]
#[command(name = "server_http", version)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    info!(host = %args.host, port = args.port, "starting game server");

    let session = SessionHandle::new(SessionConfig::default());
    let app = router(session);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("server ready, waiting for two players to register");

    axum::serve(listener, app).await?;

    Ok(())
}
