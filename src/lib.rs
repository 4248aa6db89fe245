//! # Serpentarium
//!
//! Evolutionary snake simulation on a bounded grid.
//!
//! ## Features
//!
//! - **Genetic behaviour**: vision range and hunger/mating thresholds come from genes
//! - **Sexual reproduction**: adjacent snakes breed with crossover, mutation and blended colors
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: seeded random number generation
//! - **Web view**: Axum server exposing the grid as JSON plus a canvas page
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serpentarium::{World, Config};
//!
//! let mut world = World::new_with_seed(Config::default(), 42).unwrap();
//!
//! // Run simulation
//! world.run(1000);
//!
//! println!("Population: {}", world.population());
//! println!("{}", world.stats.summary());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use serpentarium::Config;
//!
//! let mut config = Config::default();
//! config.snakes.initial_count = 8;
//! config.evolution.mutation_rate = 0.05;
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod genetics;
pub mod grid;
pub mod shared;
pub mod snake;
pub mod stats;
pub mod web;
pub mod world;

// Re-export main types
pub use config::Config;
pub use shared::{SimulationHandle, WorldSnapshot};
pub use snake::Snake;
pub use world::{World, WorldError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick headless benchmark. The grid grows when `population` would
/// crowd the default one.
pub fn benchmark(steps: u64, population: usize) -> Result<BenchmarkResult, WorldError> {
    use std::time::Instant;

    let mut config = Config::default();
    config.snakes.initial_count = population;
    config.food.initial_count = population * 2;
    let needed = population * 4;
    if needed > config.cell_count() {
        let side = (needed as f64).sqrt().ceil() as usize;
        config.world.width = side;
        config.world.height = side;
    }

    let mut world = World::new(config)?;

    let start = Instant::now();
    world.run(steps);
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        steps,
        initial_population: population,
        final_population: world.population(),
        elapsed_secs: elapsed.as_secs_f64(),
        steps_per_second: steps as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        births: world.last_snake_id().saturating_sub(population as u64),
    })
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub steps: u64,
    pub initial_population: usize,
    pub final_population: usize,
    pub elapsed_secs: f64,
    pub steps_per_second: f64,
    pub births: u64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Population: {} -> {}", self.initial_population, self.final_population)?;
        writeln!(f, "Births: {}", self.births)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} steps/s", self.steps_per_second)?;
        Ok(())
    }
}
