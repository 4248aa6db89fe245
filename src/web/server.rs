//! Axum server setup.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::shared::SimulationHandle;
use crate::{Config, World};

use super::routes::api_router;
use super::state::AppState;

/// Build the router: JSON endpoints plus the static page
pub fn build_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    // CORS layer for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_router())
        .fallback_service(ServeDir::new(static_dir.as_ref()).append_index_html_on_directories(true))
        .layer(cors)
        .with_state(state)
}

/// Run the web server until Ctrl-C, then stop the driver
pub async fn run_server(
    config: Config,
    bind: SocketAddr,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let world = match seed {
        Some(seed) => World::new_with_seed(config.clone(), seed)?,
        None => World::new(config.clone())?,
    };
    let tick_interval = Duration::from_millis(config.driver.tick_interval_ms);
    let shutdown_timeout = Duration::from_millis(config.driver.shutdown_timeout_ms);

    let sim = Arc::new(SimulationHandle::spawn(world, tick_interval));
    let app = build_router(Arc::new(AppState::new(sim.clone())), "static");

    log::info!("Starting web server on http://{}", bind);
    println!("Serpentarium available at http://{}", bind);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Web server stopped, shutting down simulation");
    if !sim.shutdown(shutdown_timeout).await {
        log::warn!("Simulation did not stop cleanly");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
    }
}
