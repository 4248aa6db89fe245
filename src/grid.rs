//! Grid geometry, bounds and food bookkeeping.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A grid coordinate. Signed so that candidate moves past the edge are
/// representable before the bounds check rejects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another cell
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The neighbouring cell one step in `direction`
    #[inline]
    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

/// The four cardinal unit moves. `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order random choices index into
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Unit horizontal move toward the sign of `dx`, if any
    pub fn horizontal(dx: i32) -> Option<Direction> {
        match dx.signum() {
            1 => Some(Direction::Right),
            -1 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Unit vertical move toward the sign of `dy`, if any
    pub fn vertical(dy: i32) -> Option<Direction> {
        match dy.signum() {
            1 => Some(Direction::Down),
            -1 => Some(Direction::Up),
            _ => None,
        }
    }
}

/// Immutable grid bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    width: usize,
    height: usize,
}

impl Environment {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Check that a cell lies in `[0, width) x [0, height)`
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    /// Uniformly random cell, occupied or not
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        let x = rng.gen_range(0..self.width) as i32;
        let y = rng.gen_range(0..self.height) as i32;
        Cell::new(x, y)
    }

    /// Rejection-sample a cell not in `occupied`, giving up after
    /// `width * height` attempts.
    pub fn random_empty_cell<R: Rng>(&self, occupied: &HashSet<Cell>, rng: &mut R) -> Option<Cell> {
        (0..self.cell_count())
            .map(|_| self.random_cell(rng))
            .find(|cell| !occupied.contains(cell))
    }

    /// Every cell not in `occupied`, row by row
    pub fn empty_cells(&self, occupied: &HashSet<Cell>) -> Vec<Cell> {
        let mut cells = Vec::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let cell = Cell::new(x, y);
                if !occupied.contains(&cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }
}

/// Edible cells, kept in insertion order. The order matters: perception
/// breaks distance ties by the earliest entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodSet {
    cells: Vec<Cell>,
}

impl FoodSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a food cell; duplicates are ignored. Returns whether it was added.
    pub fn insert(&mut self, cell: Cell) -> bool {
        if self.contains(cell) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    /// Remove a food cell, keeping the order of the rest
    pub fn remove(&mut self, cell: Cell) -> bool {
        match self.cells.iter().position(|&c| c == cell) {
            Some(idx) => {
                self.cells.remove(idx);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
