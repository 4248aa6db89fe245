//! Configuration system for the snake simulation.
//!
//! Supports YAML configuration files with sensible defaults. The simulation
//! core only ever receives a ready `Config`; loading from disk is left to the
//! binary.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub snakes: SnakeConfig,
    pub food: FoodConfig,
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub genes: GeneScaling,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Grid dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

/// Snake population configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeConfig {
    /// Number of snakes at start (and after a reset)
    pub initial_count: usize,
    /// Starting energy for the initial population
    pub initial_energy: i64,
    /// Energy spent per move
    pub movement_cost: i64,
    /// Snakes older than this are removed
    pub max_age: u32,
    /// Colors handed out to the initial population
    pub palette: Vec<String>,
}

/// Food configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodConfig {
    /// Food items placed at start (and after a reset)
    pub initial_count: usize,
    /// Energy gained from eating one item
    pub energy: i64,
    /// Minimum food kept on the grid while snakes are alive
    pub floor: usize,
    /// Upper bound on items added when the grid runs out of food
    pub refill_batch: usize,
}

/// Reproduction and inheritance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Per-gene probability of being replaced by a fresh random value
    pub mutation_rate: f32,
    /// Energy paid by each parent; newborns start with twice this amount
    pub reproduction_cost: i64,
    /// Maximum per-channel color perturbation for offspring
    pub color_jitter: i16,
    /// Length of every gene vector
    pub gene_count: usize,
}

/// Scaling constants turning genes into behaviour parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneScaling {
    /// Vision range for a gene value of 1.0
    pub max_vision: u32,
    /// Energy threshold for a gene value of 1.0
    pub max_energy_scale: f32,
}

/// Background driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Pause between two ticks
    pub tick_interval_ms: u64,
    /// How long shutdown waits for the driver to exit
    pub shutdown_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Steps between stats history samples
    pub stats_interval: u64,
    /// Maximum number of samples kept in the stats history
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            snakes: SnakeConfig::default(),
            food: FoodConfig::default(),
            evolution: EvolutionConfig::default(),
            genes: GeneScaling::default(),
            driver: DriverConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
        }
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            initial_count: 5,
            initial_energy: 1000,
            movement_cost: 5,
            max_age: 10_000,
            palette: ["#0000FF", "#800080", "#FFA500", "#FFC0CB", "#008000"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            initial_count: 10,
            energy: 50,
            floor: 5,
            refill_batch: 5,
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.1,
            reproduction_cost: 25,
            color_jitter: 10,
            gene_count: 10,
        }
    }
}

impl Default for GeneScaling {
    fn default() -> Self {
        Self {
            max_vision: 10,
            max_energy_scale: 200.0,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            shutdown_timeout_ms: 2000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            stats_interval: 10,
            history_capacity: 1000,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.world.width * self.world.height
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err("grid width and height must be > 0".to_string());
        }
        if self.world.width > i32::MAX as usize || self.world.height > i32::MAX as usize {
            return Err("grid dimensions do not fit in cell coordinates".to_string());
        }
        if self.snakes.initial_count > self.cell_count() {
            return Err(format!(
                "initial_count ({}) exceeds the number of grid cells ({})",
                self.snakes.initial_count,
                self.cell_count()
            ));
        }
        if self.snakes.movement_cost < 0 {
            return Err("movement_cost must be >= 0".to_string());
        }
        if self.evolution.reproduction_cost < 0 {
            return Err("reproduction_cost must be >= 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.evolution.mutation_rate) {
            return Err("mutation_rate must be between 0 and 1".to_string());
        }
        if self.evolution.gene_count == 0 {
            return Err("gene_count must be > 0".to_string());
        }
        if !(0..=255).contains(&self.evolution.color_jitter) {
            return Err("color_jitter must be between 0 and 255".to_string());
        }
        if self.genes.max_energy_scale < 0.0 {
            return Err("max_energy_scale must be >= 0".to_string());
        }
        if self.logging.stats_interval == 0 {
            return Err("stats_interval must be > 0".to_string());
        }
        Ok(())
    }
}
