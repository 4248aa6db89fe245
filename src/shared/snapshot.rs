//! Serializable point-in-time view of the world, handed to the HTTP layer.

use serde::{Deserialize, Serialize};

use crate::grid::Cell;
use crate::snake::{Snake, SnakeId};
use crate::stats::Stats;
use crate::world::World;

/// Number of genes shown per snake
pub const DISPLAYED_GENES: usize = 3;

/// Lightweight snake data for rendering
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnakeView {
    pub id: SnakeId,
    /// Head first
    pub body: Vec<[i32; 2]>,
    pub color: String,
    pub energy: i64,
    pub age: u32,
    pub food_eaten: u32,
    pub children: u32,
    /// First genes rounded to two decimals
    pub genes_display: Vec<f32>,
}

impl SnakeView {
    pub fn from_snake(snake: &Snake) -> Self {
        Self {
            id: snake.id,
            body: snake.body.iter().map(|c| [c.x, c.y]).collect(),
            color: snake.color.to_string(),
            energy: snake.energy,
            age: snake.age,
            food_eaten: snake.food_eaten,
            children: snake.children,
            genes_display: snake.genome.display_prefix(DISPLAYED_GENES),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

/// Snapshot of world state for rendering
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub step: u64,
    pub snakes: Vec<SnakeView>,
    pub food: Vec<[i32; 2]>,
    pub dimensions: Dimensions,
    pub stats: Stats,
}

impl WorldSnapshot {
    /// Create a snapshot from the current world state
    pub fn from_world(world: &World) -> Self {
        Self {
            step: world.time,
            snakes: world.snakes.iter().map(SnakeView::from_snake).collect(),
            food: world.food.iter().map(|Cell { x, y }| [x, y]).collect(),
            dimensions: Dimensions {
                width: world.env.width(),
                height: world.env.height(),
            },
            stats: world.stats.clone(),
        }
    }

    pub fn population(&self) -> usize {
        self.snakes.len()
    }
}
