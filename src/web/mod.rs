//! Web UI module for Serpentarium.
//!
//! Serves the grid to a browser using Axum.
//!
//! ## Architecture
//!
//! - **Simulation Task**: runs `World::step()` every `tick_interval_ms`
//! - **REST API**: `GET /game_state`, `POST /reset_simulation`,
//!   `GET /api/stats`, `GET /api/stats/history`
//! - **Static page**: everything else is served from `static/`
//!
//! ## Usage
//!
//! ```no_run
//! use serpentarium::Config;
//! use serpentarium::web::run_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     run_server(config, "127.0.0.1:5000".parse().unwrap(), None).await.unwrap();
//! }
//! ```

mod routes;
mod server;
mod state;

pub use routes::ResetResponse;
pub use server::{build_router, run_server};
pub use state::AppState;
