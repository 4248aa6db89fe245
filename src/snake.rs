//! Snake structure, perception and decision making.

use crate::config::GeneScaling;
use crate::genetics::{Color, Genome};
use crate::grid::{Cell, Direction, Environment, FoodSet};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Unique snake identifier
pub type SnakeId = u64;

/// Why a snake was removed from the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Starvation,
    OldAge,
    WallCollision,
}

/// What a snake is heading for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Food(Cell),
    Mate { id: SnakeId, head: Cell },
}

impl Target {
    pub fn position(&self) -> Cell {
        match *self {
            Target::Food(cell) => cell,
            Target::Mate { head, .. } => head,
        }
    }
}

/// Read-only view of the world a snake perceives when deciding
pub struct Senses<'a> {
    pub env: &'a Environment,
    pub food: &'a FoodSet,
    pub snakes: &'a [Snake],
    pub reproduction_cost: i64,
    pub scaling: &'a GeneScaling,
}

/// A snake in the simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    // Identity
    pub id: SnakeId,
    pub color: Color,
    pub genome: Genome,

    // Physical state; head is the front, never empty
    pub body: VecDeque<Cell>,
    pub energy: i64,
    pub age: u32,

    // Statistics
    pub food_eaten: u32,
    pub children: u32,
}

impl Snake {
    /// Create a one-segment snake
    pub fn new(id: SnakeId, head: Cell, color: Color, genome: Genome, energy: i64) -> Self {
        let mut body = VecDeque::with_capacity(4);
        body.push_back(head);
        Self {
            id,
            color,
            genome,
            body,
            energy,
            age: 0,
            food_eaten: 0,
            children: 0,
        }
    }

    /// Create a snake from an explicit head-first body. `None` if the body is empty.
    pub fn with_body(
        id: SnakeId,
        body: impl IntoIterator<Item = Cell>,
        color: Color,
        genome: Genome,
        energy: i64,
    ) -> Option<Self> {
        let body: VecDeque<Cell> = body.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self {
            id,
            color,
            genome,
            body,
            energy,
            age: 0,
            food_eaten: 0,
            children: 0,
        })
    }

    #[inline]
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Second segment, which the snake may not move into
    #[inline]
    pub fn neck(&self) -> Option<Cell> {
        self.body.get(1).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Reason this snake can no longer live, if any
    pub fn exhaustion(&self, max_age: u32) -> Option<DeathCause> {
        if self.energy <= 0 {
            Some(DeathCause::Starvation)
        } else if self.age > max_age {
            Some(DeathCause::OldAge)
        } else {
            None
        }
    }

    /// Commit a move: new head in front, pay the movement cost, age one tick
    pub fn advance(&mut self, new_head: Cell, movement_cost: i64) {
        self.body.push_front(new_head);
        self.energy -= movement_cost;
        self.age += 1;
    }

    /// Drop the tail segment unless only the head is left
    pub fn shrink(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    /// Head overlaps another of its own segments
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&c| c == head)
    }

    /// Pick this tick's target by energy level and what is in sight
    pub fn choose_target(&self, senses: &Senses) -> Option<Target> {
        let head = self.head();
        let vision = self.genome.vision_range(senses.scaling);
        let low = self.genome.low_energy_threshold(senses.scaling);
        let high = self.genome.high_energy_threshold(senses.scaling);
        let energy = self.energy as f32;

        if energy < low {
            let nearest_food = senses
                .food
                .iter()
                .filter(|&cell| head.manhattan(cell) <= vision)
                .min_by_key(|&cell| head.manhattan(cell));
            if let Some(cell) = nearest_food {
                log::debug!(
                    "Snake {} (E:{} < {:.0}) seeks food at {:?}",
                    self.id,
                    self.energy,
                    low,
                    cell
                );
                return Some(Target::Food(cell));
            }
        }

        if energy > high {
            let nearest_mate = senses
                .snakes
                .iter()
                .filter(|other| other.id != self.id)
                .filter(|other| head.manhattan(other.head()) <= vision)
                .filter(|other| other.energy >= senses.reproduction_cost)
                .min_by_key(|other| head.manhattan(other.head()));
            if let Some(mate) = nearest_mate {
                log::debug!(
                    "Snake {} (E:{} > {:.0}) seeks mate {} at {:?}",
                    self.id,
                    self.energy,
                    high,
                    mate.id,
                    mate.head()
                );
                return Some(Target::Mate {
                    id: mate.id,
                    head: mate.head(),
                });
            }
        }

        None
    }

    /// Directions that neither reverse into the neck nor leave the grid
    pub fn valid_directions(&self, env: &Environment) -> Vec<Direction> {
        let head = self.head();
        let neck = self.neck();
        Direction::ALL
            .iter()
            .copied()
            .filter(|&d| {
                let next = head.step(d);
                Some(next) != neck && env.contains(next)
            })
            .collect()
    }

    /// Decide this tick's move.
    ///
    /// Random draws, in order: the diagonal tie-break inside
    /// [`direction_towards`] (only with a target at equal horizontal and
    /// vertical distance), then one fallback choice when the target move is
    /// missing or not valid.
    pub fn decide<R: Rng>(&self, senses: &Senses, rng: &mut R) -> Direction {
        let head = self.head();
        let target = self.choose_target(senses);
        let preferred = target.and_then(|t| direction_towards(head, t.position(), rng));
        let valid = self.valid_directions(senses.env);

        if valid.is_empty() {
            log::warn!("Snake {} is trapped, moving at random (may be fatal)", self.id);
            return Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        }

        match preferred {
            Some(direction) if valid.contains(&direction) => direction,
            _ => valid[rng.gen_range(0..valid.len())],
        }
    }
}

/// Unit move from `from` toward `to` along the axis with the larger gap.
/// Equal non-zero gaps pick an axis at random; `None` when already there.
pub fn direction_towards<R: Rng>(from: Cell, to: Cell, rng: &mut R) -> Option<Direction> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    if dx.abs() > dy.abs() {
        Direction::horizontal(dx)
    } else if dy.abs() > dx.abs() {
        Direction::vertical(dy)
    } else if dx != 0 {
        if rng.gen_bool(0.5) {
            Direction::horizontal(dx)
        } else {
            Direction::vertical(dy)
        }
    } else {
        None
    }
}
