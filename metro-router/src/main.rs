use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use metro_router::network::load_network;
use metro_router::planner::PlannerConfig;
use metro_router::web::{AppState, create_router};

/// Default listen address.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("metro_router=info")),
        )
        .init();

    let Some(network_path) = std::env::var_os("METRO_NETWORK").map(PathBuf::from) else {
        error!("METRO_NETWORK not set; point it at a network JSON document");
        return ExitCode::FAILURE;
    };

    let addr_text = std::env::var("METRO_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = match addr_text.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(addr = %addr_text, "invalid METRO_ADDR: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = planner_config();

    let graph = match load_network(&network_path) {
        Ok(graph) => graph,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let app = create_router(AppState::new(graph, config));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(%addr, "metro route planner listening");
    info!("  GET  /health                   - Health check");
    info!("  GET  /lines                    - Line catalogue");
    info!("  GET  /stations/:id/neighbors   - Connections at a station");
    info!("  POST /route                    - Plan a route");
    info!("  POST /patrol                   - Plan a patrol");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Planner limits from the environment, falling back to defaults.
fn planner_config() -> PlannerConfig {
    let mut config = PlannerConfig::default();

    if let Some(max) = env_number("METRO_MAX_PATROL_STOPS") {
        config.max_required_stations = max as usize;
    }
    if let Some(ms) = env_number("METRO_PATROL_DEADLINE_MS") {
        config = config.with_deadline(Duration::from_millis(ms));
    }

    info!(
        max_required_stations = config.max_required_stations,
        patrol_deadline = ?config.patrol_deadline,
        "planner configured"
    );
    config
}

/// Reads a numeric environment variable, warning about unparsable values.
fn env_number(name: &str) -> Option<u64> {
    let value = std::env::var(name).ok()?;
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(%name, %value, "ignoring non-numeric value");
            None
        }
    }
}
