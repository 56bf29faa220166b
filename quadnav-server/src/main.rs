//! Thin HTTP shell around the routing engine.
//!
//! Loads the campus data files once at startup and serves route and
//! direction computations. All algorithmic work lives in `quadnav_core`;
//! handlers here only translate between HTTP and the library surface.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quadnav_core::prelude::*;

mod api;

#[derive(Parser, Debug)]
#[command(name = "quadnav-server", version, about = "Campus navigation route service")]
struct Args {
    /// Directory containing nodes.json, edges.json and routes.json
    #[arg(long, value_name = "PATH", default_value = "data")]
    data_dir: PathBuf,

    /// Address to listen on
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let map = load_campus_map(&args.data_dir)?;
    info!(
        places = map.place_count(),
        edges = map.edge_count(),
        manual_routes = map.manual_routes().len(),
        "campus data loaded"
    );

    let app = api::router(Arc::new(map));
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("listening on {}", args.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {err}");
    } else {
        info!("shutdown signal received");
    }
}
