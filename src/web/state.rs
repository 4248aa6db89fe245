//! Shared application state for the web server.

use std::sync::Arc;

use crate::shared::SimulationHandle;

/// Application state shared between all handlers
pub struct AppState {
    /// Simulation handle; the world lock lives inside it
    pub sim: Arc<SimulationHandle>,
}

impl AppState {
    pub fn new(sim: Arc<SimulationHandle>) -> Self {
        Self { sim }
    }
}
