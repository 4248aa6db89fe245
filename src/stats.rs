//! Statistics tracking for the simulation.

use crate::snake::Snake;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Statistics snapshot for a simulation step
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Current simulation step
    pub step: u64,
    /// Total population count
    pub population: usize,
    /// Food items on the grid
    pub food: usize,
    /// Births this step
    pub births: usize,
    /// Deaths this step
    pub deaths: usize,
    /// Mean energy across snakes
    pub energy_mean: f64,
    /// Mean age across snakes
    pub age_mean: f64,
    /// Mean body length across snakes
    pub length_mean: f64,
    /// Food eaten by the snakes currently alive
    pub total_food_eaten: u64,
}

impl Stats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats from current simulation state
    pub fn update(&mut self, step: u64, snakes: &[Snake], food: usize, births: usize, deaths: usize) {
        self.step = step;
        self.population = snakes.len();
        self.food = food;
        self.births = births;
        self.deaths = deaths;

        if snakes.is_empty() {
            self.energy_mean = 0.0;
            self.age_mean = 0.0;
            self.length_mean = 0.0;
            self.total_food_eaten = 0;
        } else {
            let n = snakes.len() as f64;
            self.energy_mean = snakes.iter().map(|s| s.energy as f64).sum::<f64>() / n;
            self.age_mean = snakes.iter().map(|s| s.age as f64).sum::<f64>() / n;
            self.length_mean = snakes.iter().map(|s| s.len() as f64).sum::<f64>() / n;
            self.total_food_eaten = snakes.iter().map(|s| s.food_eaten as u64).sum();
        }
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Pop:{:4} | Food:{:3} | Energy:{:.0} | Age:{:.0} | Len:{:.1} | +{} -{}",
            self.step,
            self.population,
            self.food,
            self.energy_mean,
            self.age_mean,
            self.length_mean,
            self.births,
            self.deaths
        )
    }
}

/// Historical statistics tracker, keeping at most `capacity` samples
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// Recorded stats snapshots, oldest first
    pub snapshots: VecDeque<Stats>,
    /// Recording interval in steps
    pub interval: u64,
    pub capacity: usize,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64, capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            interval: interval.max(1),
            capacity,
        }
    }

    /// Record a copy if the step falls on the interval
    pub fn record(&mut self, stats: &Stats) {
        if self.capacity == 0 || stats.step % self.interval != 0 {
            return;
        }
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(stats.clone());
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&Stats> {
        self.snapshots.back()
    }

    /// Get population over time
    pub fn population_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.step, s.population)).collect()
    }

    /// Get mean energy over time
    pub fn energy_series(&self) -> Vec<(u64, f64)> {
        self.snapshots.iter().map(|s| (s.step, s.energy_mean)).collect()
    }
}
