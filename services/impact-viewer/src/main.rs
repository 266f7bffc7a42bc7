//! Impact Viewer Server
//!
//! Serves a 3D globe of meteorite landings and impact craters.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use impact_viewer::config::ServerConfig;
use impact_viewer::loader::spawn_loads;
use impact_viewer::state::AppState;

/// Impact Viewer Server
#[derive(Parser, Debug)]
#[command(name = "impact-viewer")]
#[command(about = "Web viewer for meteorite landings and impact craters")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:5000", env = "IMPACT_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "IMPACT_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = match runtime_builder.build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async move {
        if let Err(e) = run_server(args).await {
            error!("Server failed: {:#}", e);
            std::process::exit(1);
        }
    });
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting impact viewer");

    // A missing token is fatal.
    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder not installed: {}", e);
            None
        }
    };

    let refresh = server_config.refresh_interval;
    let state = match AppState::new(server_config, prometheus) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application state: {:#}", e);
            std::process::exit(1);
        }
    };

    spawn_loads(Arc::clone(&state.loader), Arc::clone(&state.store), refresh);

    let app = impact_viewer::app(state);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Impact viewer listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
