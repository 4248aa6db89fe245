//! World simulation engine - main simulation loop.

use crate::config::Config;
use crate::genetics::{inherit_color, recombine, Color, Genome};
use crate::grid::{Cell, Environment, FoodSet};
use crate::shared::WorldSnapshot;
use crate::snake::{DeathCause, Senses, Snake, SnakeId};
use crate::stats::{Stats, StatsHistory};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A snake removed during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Death {
    pub id: SnakeId,
    pub cause: DeathCause,
    pub energy: i64,
    pub age: u32,
}

/// The simulation world
pub struct World {
    // Population (order is turn order and tie-break order)
    pub snakes: Vec<Snake>,

    // Environment
    pub env: Environment,
    pub food: FoodSet,

    // State
    pub time: u64,

    // Configuration
    pub config: Config,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,
    pub last_deaths: Vec<Death>,

    // ID generation
    next_snake_id: SnakeId,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,

    births_this_step: usize,
}

/// Population and food produced by initialisation, swapped in as a whole
struct Population {
    snakes: Vec<Snake>,
    food: FoodSet,
    next_snake_id: SnakeId,
}

impl World {
    /// Create a new world with the given configuration
    pub fn new(config: Config) -> Result<Self, WorldError> {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Result<Self, WorldError> {
        config.validate().map_err(WorldError::InvalidConfig)?;

        let env = Environment::new(config.world.width, config.world.height);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let population = Self::populate(&config, &env, &mut rng)?;

        let mut world = Self {
            snakes: population.snakes,
            env,
            food: population.food,
            time: 0,
            stats: Stats::new(),
            stats_history: StatsHistory::new(
                config.logging.stats_interval,
                config.logging.history_capacity,
            ),
            last_deaths: Vec::new(),
            config,
            next_snake_id: population.next_snake_id,
            rng,
            seed,
            births_this_step: 0,
        };
        world.update_stats();

        log::info!(
            "World initialised with {} snakes and {} food (seed {})",
            world.snakes.len(),
            world.food.len(),
            seed
        );
        Ok(world)
    }

    /// Build the initial population and food without touching `self`
    fn populate(config: &Config, env: &Environment, rng: &mut ChaCha8Rng) -> Result<Population, WorldError> {
        let mut snakes: Vec<Snake> = Vec::with_capacity(config.snakes.initial_count);
        let mut occupied: HashSet<Cell> = HashSet::new();
        let mut next_snake_id: SnakeId = 0;

        for placed in 0..config.snakes.initial_count {
            let head = match env.random_empty_cell(&occupied, rng) {
                Some(cell) => cell,
                None => {
                    let free = env.empty_cells(&occupied);
                    if free.is_empty() {
                        return Err(WorldError::NoRoom {
                            placed,
                            requested: config.snakes.initial_count,
                        });
                    }
                    free[rng.gen_range(0..free.len())]
                }
            };
            let color = if config.snakes.palette.is_empty() {
                Color::Rgb(0, 128, 0)
            } else {
                Color::parse(&config.snakes.palette[rng.gen_range(0..config.snakes.palette.len())])
            };
            let genome = Genome::random(config.evolution.gene_count, rng);

            next_snake_id += 1;
            let snake = Snake::new(next_snake_id, head, color, genome, config.snakes.initial_energy);
            log::debug!(
                "Initial snake {} at {:?} with color {} and energy {}",
                snake.id,
                head,
                snake.color,
                snake.energy
            );
            occupied.insert(head);
            snakes.push(snake);
        }

        let mut food = FoodSet::new();
        for _ in 0..config.food.initial_count {
            match env.random_empty_cell(&occupied, rng) {
                Some(cell) => {
                    food.insert(cell);
                    occupied.insert(cell);
                }
                None => log::warn!("No room left for initial food"),
            }
        }

        Ok(Population {
            snakes,
            food,
            next_snake_id,
        })
    }

    /// Insert a snake with the next free id. Returns `None` for an empty body.
    pub fn spawn_snake(
        &mut self,
        body: impl IntoIterator<Item = Cell>,
        energy: i64,
        genome: Option<Genome>,
    ) -> Option<SnakeId> {
        let genome = match genome {
            Some(genome) => genome,
            None => Genome::random(self.config.evolution.gene_count, &mut self.rng),
        };
        let id = self.next_snake_id + 1;
        let snake = Snake::with_body(id, body, Color::Rgb(0, 128, 0), genome, energy)?;
        self.next_snake_id = id;
        self.snakes.push(snake);
        Some(id)
    }

    /// Every cell covered by food or by any snake segment
    fn occupied_cells(&self) -> HashSet<Cell> {
        self.food
            .iter()
            .chain(self.snakes.iter().flat_map(|s| s.body.iter().copied()))
            .collect()
    }

    /// Place up to `count` food items on free cells
    fn add_food(&mut self, count: usize) {
        for _ in 0..count {
            let occupied = self.occupied_cells();
            match self.env.random_empty_cell(&occupied, &mut self.rng) {
                Some(cell) => {
                    self.food.insert(cell);
                }
                None => {
                    log::warn!("Could not find room to add food");
                }
            }
        }
    }

    /// Main simulation step
    pub fn step(&mut self) {
        self.births_this_step = 0;
        self.last_deaths.clear();

        // Phase 1: Move, feed and check deaths, one snake at a time
        let mut doomed: Vec<Option<DeathCause>> = vec![None; self.snakes.len()];
        for idx in 0..self.snakes.len() {
            doomed[idx] = self.advance_snake(idx);
        }

        // Phase 2: Pair up adjacent survivors
        let offspring = self.handle_reproduction(&doomed);

        // Phase 3: Remove the dead, then welcome the newborns
        self.remove_dead(&doomed);
        self.births_this_step = offspring.len();
        if !offspring.is_empty() {
            log::info!("Step {}: {} newborn(s)", self.time, offspring.len());
        }
        self.snakes.extend(offspring);

        self.time += 1;

        // Phase 4: Keep some food around
        self.replenish_food();

        // Phase 5: Update statistics
        self.update_stats();
    }

    /// Run one snake's turn. Returns the cause if it has to be removed.
    fn advance_snake(&mut self, idx: usize) -> Option<DeathCause> {
        let max_age = self.config.snakes.max_age;

        if let Some(cause) = self.snakes[idx].exhaustion(max_age) {
            log::debug!(
                "Snake {} removed before moving: {:?} (E:{}, age {})",
                self.snakes[idx].id,
                cause,
                self.snakes[idx].energy,
                self.snakes[idx].age
            );
            return Some(cause);
        }

        let direction = {
            let senses = Senses {
                env: &self.env,
                food: &self.food,
                snakes: &self.snakes,
                reproduction_cost: self.config.evolution.reproduction_cost,
                scaling: &self.config.genes,
            };
            self.snakes[idx].decide(&senses, &mut self.rng)
        };

        let new_head = self.snakes[idx].head().step(direction);
        if !self.env.contains(new_head) {
            log::debug!("Snake {} hit the wall moving {:?}", self.snakes[idx].id, direction);
            return Some(DeathCause::WallCollision);
        }

        self.snakes[idx].advance(new_head, self.config.snakes.movement_cost);

        let fed = self.food.remove(new_head);
        if fed {
            let snake = &mut self.snakes[idx];
            snake.energy += self.config.food.energy;
            snake.food_eaten += 1;
            log::debug!(
                "Snake {} ate food #{} at {:?}, energy {}",
                snake.id,
                snake.food_eaten,
                new_head,
                snake.energy
            );
            self.add_food(1);
        } else {
            self.snakes[idx].shrink();
        }

        if self.snakes[idx].bites_itself() {
            log::warn!(
                "Snake {} collided with itself at {:?} (not fatal)",
                self.snakes[idx].id,
                new_head
            );
        }

        self.snakes[idx].exhaustion(max_age)
    }

    /// Pair adjacent survivors in population order. Each snake reproduces at
    /// most once per tick; newborns are returned, not inserted.
    fn handle_reproduction(&mut self, doomed: &[Option<DeathCause>]) -> Vec<Snake> {
        let candidates: Vec<usize> = (0..self.snakes.len())
            .filter(|&idx| doomed[idx].is_none())
            .collect();
        let mut reproduced = vec![false; self.snakes.len()];
        let mut offspring: Vec<Snake> = Vec::new();

        for (pos, &i) in candidates.iter().enumerate() {
            if reproduced[i] {
                continue;
            }
            for &j in &candidates[pos + 1..] {
                if reproduced[j] {
                    continue;
                }
                if self.snakes[i].head().manhattan(self.snakes[j].head()) != 1 {
                    continue;
                }
                if let Some(child) = self.reproduce(i, j, &offspring) {
                    offspring.push(child);
                    reproduced[i] = true;
                    reproduced[j] = true;
                    break;
                }
            }
        }

        offspring
    }

    /// Try to breed snakes `i` and `j`.
    ///
    /// Both parents pay the reproduction cost as soon as they qualify; if no
    /// free cell is left for the child the cost is not refunded.
    fn reproduce(&mut self, i: usize, j: usize, newborns: &[Snake]) -> Option<Snake> {
        let cost = self.config.evolution.reproduction_cost;
        log::debug!(
            "Snakes {} (E:{}) and {} (E:{}) try to reproduce",
            self.snakes[i].id,
            self.snakes[i].energy,
            self.snakes[j].id,
            self.snakes[j].energy
        );

        if self.snakes[i].energy < cost || self.snakes[j].energy < cost {
            log::debug!(
                "Reproduction between {} and {} failed: not enough energy",
                self.snakes[i].id,
                self.snakes[j].id
            );
            return None;
        }

        self.snakes[i].energy -= cost;
        self.snakes[j].energy -= cost;

        let genome = recombine(
            &self.snakes[i].genome,
            &self.snakes[j].genome,
            self.config.evolution.mutation_rate,
            &mut self.rng,
        );
        let color = inherit_color(
            &self.snakes[i].color,
            &self.snakes[j].color,
            self.config.evolution.color_jitter,
            &mut self.rng,
        );

        let mut occupied = self.occupied_cells();
        occupied.extend(newborns.iter().flat_map(|s| s.body.iter().copied()));
        let free = self.env.empty_cells(&occupied);
        if free.is_empty() {
            log::warn!(
                "Snakes {} and {} found no free cell for their child; energy is lost",
                self.snakes[i].id,
                self.snakes[j].id
            );
            return None;
        }
        let birthplace = free[self.rng.gen_range(0..free.len())];

        self.snakes[i].children += 1;
        self.snakes[j].children += 1;

        self.next_snake_id += 1;
        let child = Snake::new(self.next_snake_id, birthplace, color, genome, cost * 2);
        log::info!(
            "Snakes {} and {} produced child {} at {:?} with energy {}",
            self.snakes[i].id,
            self.snakes[j].id,
            child.id,
            birthplace,
            child.energy
        );
        Some(child)
    }

    /// Remove snakes marked during this tick, remembering why
    fn remove_dead(&mut self, doomed: &[Option<DeathCause>]) {
        let mut idx = 0;
        let mut deaths = Vec::new();
        self.snakes.retain(|snake| {
            let cause = doomed[idx];
            idx += 1;
            match cause {
                Some(cause) => {
                    deaths.push(Death {
                        id: snake.id,
                        cause,
                        energy: snake.energy,
                        age: snake.age,
                    });
                    false
                }
                None => true,
            }
        });

        if !deaths.is_empty() {
            log::info!(
                "Step {}: removing {} snake(s) {:?}, {} left",
                self.time,
                deaths.len(),
                deaths.iter().map(|d| d.id).collect::<Vec<_>>(),
                self.snakes.len()
            );
        }
        self.last_deaths = deaths;
    }

    /// Refill food: a batch when it ran out, otherwise one item per tick
    /// until the floor is reached.
    fn replenish_food(&mut self) {
        if self.snakes.is_empty() {
            return;
        }
        if self.food.is_empty() {
            let count = self.config.food.refill_batch.min(self.snakes.len());
            log::debug!("No food left, adding {} items", count);
            self.add_food(count);
        } else if self.food.len() < self.config.food.floor {
            self.add_food(1);
        }
    }

    /// Update statistics
    fn update_stats(&mut self) {
        self.stats
            .update(self.time, &self.snakes, self.food.len(), self.births_this_step, self.last_deaths.len());
        self.stats_history.record(&self.stats);
    }

    /// Point-in-time view of the world
    pub fn get_state(&self) -> WorldSnapshot {
        WorldSnapshot::from_world(self)
    }

    /// Reinitialise population, food and step counter from the configuration,
    /// keeping the new state only if initialisation fully succeeds.
    pub fn try_reset(&mut self) -> Result<(), WorldError> {
        log::info!("Resetting simulation");
        let population = Self::populate(&self.config, &self.env, &mut self.rng)?;

        self.snakes = population.snakes;
        self.food = population.food;
        self.next_snake_id = population.next_snake_id;
        self.time = 0;
        self.births_this_step = 0;
        self.last_deaths.clear();
        self.stats_history.clear();
        self.update_stats();

        log::info!(
            "Simulation reset: {} snakes, {} food",
            self.snakes.len(),
            self.food.len()
        );
        Ok(())
    }

    /// Reset and report success; failures are logged and leave the world unchanged
    pub fn reset(&mut self) -> bool {
        match self.try_reset() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Reset failed: {}", e);
                false
            }
        }
    }

    /// Run simulation for specified number of steps
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Get current population count
    pub fn population(&self) -> usize {
        self.snakes.len()
    }

    /// Check if population is extinct
    pub fn is_extinct(&self) -> bool {
        self.snakes.is_empty()
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next id that will be handed out, minus one
    pub fn last_snake_id(&self) -> SnakeId {
        self.next_snake_id
    }

    pub fn find(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id == id)
    }
}

/// Errors that can occur while building or resetting a world
#[derive(Debug)]
pub enum WorldError {
    InvalidConfig(String),
    NoRoom { placed: usize, requested: usize },
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::NoRoom { placed, requested } => {
                write!(f, "No room on the grid: placed {} of {} snakes", placed, requested)
            }
        }
    }
}

impl std::error::Error for WorldError {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Config with nothing spawned so scenarios can be built by hand
    fn empty_config(width: usize, height: usize) -> Config {
        let mut config = Config::default();
        config.world.width = width;
        config.world.height = height;
        config.snakes.initial_count = 0;
        config.food.initial_count = 0;
        config
    }

    /// Vision 1, never hungry, always looking for a mate
    fn mate_seeker() -> Genome {
        Genome::new(vec![0.0; 10])
    }

    /// Full vision, always hungry
    fn forager() -> Genome {
        Genome::new(vec![1.0; 10])
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.world.width = 20;
        config.world.height = 15;
        config.snakes.initial_count = 12;
        config.snakes.initial_energy = 300;
        config.food.initial_count = 15;
        config
    }

    #[test]
    fn test_world_creation() {
        let config = test_config();
        let world = World::new_with_seed(config.clone(), 1).unwrap();

        assert_eq!(world.population(), config.snakes.initial_count);
        assert_eq!(world.food.len(), config.food.initial_count);
        assert_eq!(world.time, 0);

        let heads: HashSet<Cell> = world.snakes.iter().map(|s| s.head()).collect();
        assert_eq!(heads.len(), world.snakes.len());
        for snake in &world.snakes {
            assert_eq!(snake.energy, 300);
            assert_eq!(snake.genome.len(), 10);
            assert!(!world.food.contains(snake.head()));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = test_config();
        config.world.width = 0;
        assert!(matches!(
            World::new_with_seed(config, 1),
            Err(WorldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_packed_grid_places_every_snake() {
        let mut config = empty_config(3, 3);
        config.snakes.initial_count = 9;
        let world = World::new_with_seed(config, 5).unwrap();
        let heads: HashSet<Cell> = world.snakes.iter().map(|s| s.head()).collect();
        assert_eq!(heads.len(), 9);
    }

    #[test]
    fn test_world_step() {
        let mut world = World::new_with_seed(test_config(), 2).unwrap();
        world.step();
        assert_eq!(world.time, 1);
        assert_eq!(world.stats.step, 1);
    }

    #[test]
    fn test_bodies_stay_in_bounds() {
        let mut world = World::new_with_seed(test_config(), 3).unwrap();
        for _ in 0..300 {
            world.step();
            for snake in &world.snakes {
                assert!(snake.body.iter().all(|&c| world.env.contains(c)));
            }
        }
    }

    #[test]
    fn test_starving_snake_dies_after_move() {
        let mut world = World::new_with_seed(empty_config(10, 10), 4).unwrap();
        let id = world.spawn_snake([Cell::new(5, 5)], 3, None).unwrap();

        world.step();

        assert_eq!(world.population(), 0);
        assert_eq!(
            world.last_deaths,
            vec![Death {
                id,
                cause: DeathCause::Starvation,
                energy: -2,
                age: 1
            }]
        );
        assert!(world.get_state().snakes.is_empty());
    }

    #[test]
    fn test_old_snake_dies_before_moving() {
        let mut config = empty_config(10, 10);
        config.snakes.max_age = 5;
        let mut world = World::new_with_seed(config, 5).unwrap();
        let id = world.spawn_snake([Cell::new(5, 5)], 100, None).unwrap();
        world.snakes[0].age = 6;

        world.step();

        assert!(world.find(id).is_none());
        assert_eq!(world.last_deaths[0].cause, DeathCause::OldAge);
        assert_eq!(world.last_deaths[0].energy, 100);
    }

    #[test]
    fn test_trapped_snake_hits_wall() {
        let mut world = World::new_with_seed(empty_config(1, 1), 6).unwrap();
        world.spawn_snake([Cell::new(0, 0)], 100, None).unwrap();

        world.step();

        assert!(world.is_extinct());
        assert_eq!(world.last_deaths[0].cause, DeathCause::WallCollision);
        // Wall collisions happen before paying for the move
        assert_eq!(world.last_deaths[0].energy, 100);
    }

    #[test]
    fn test_moving_costs_energy_and_ages() {
        let mut world = World::new_with_seed(empty_config(10, 10), 7).unwrap();
        let id = world.spawn_snake([Cell::new(5, 5), Cell::new(5, 6)], 100, None).unwrap();

        world.step();

        let snake = world.find(id).unwrap();
        assert_eq!(snake.energy, 95);
        assert_eq!(snake.age, 1);
        assert_eq!(snake.len(), 2);
        assert_ne!(snake.head(), Cell::new(5, 5));
        assert_eq!(snake.body[1], Cell::new(5, 5));
    }

    #[test]
    fn test_feeding() {
        let mut world = World::new_with_seed(empty_config(10, 10), 8).unwrap();
        let id = world.spawn_snake([Cell::new(5, 5)], 100, Some(forager())).unwrap();
        world.food.insert(Cell::new(5, 6));

        world.step();

        let snake = world.find(id).unwrap();
        assert_eq!(snake.head(), Cell::new(5, 6));
        assert_eq!(snake.energy, 100 - 5 + 50);
        assert_eq!(snake.food_eaten, 1);
        // Fed snakes keep their tail
        assert_eq!(snake.len(), 2);
        assert!(!world.food.contains(Cell::new(5, 6)));
        // One replacement while eating, one more from the floor top-up
        assert_eq!(world.food.len(), 2);
    }

    #[test]
    fn test_adjacent_pair_reproduces() {
        let mut world = World::new_with_seed(empty_config(5, 5), 9).unwrap();
        let a = world.spawn_snake([Cell::new(2, 2)], 30, Some(mate_seeker())).unwrap();
        let b = world.spawn_snake([Cell::new(2, 3)], 30, Some(mate_seeker())).unwrap();

        world.step();

        assert_eq!(world.population(), 3);
        for id in [a, b] {
            let parent = world.find(id).unwrap();
            assert_eq!(parent.energy, 30 - 5 - 25);
            assert_eq!(parent.children, 1);
        }
        let child = &world.snakes[2];
        assert_eq!(child.id, b + 1);
        assert_eq!(child.energy, 50);
        assert_eq!(child.age, 0);
        assert_eq!(child.genome.len(), 10);
        assert_eq!(world.stats.births, 1);
    }

    #[test]
    fn test_child_takes_the_only_free_cell() {
        let mut world = World::new_with_seed(empty_config(1, 3), 10).unwrap();
        world.spawn_snake([Cell::new(0, 0)], 30, Some(mate_seeker())).unwrap();
        world.spawn_snake([Cell::new(0, 1)], 30, Some(mate_seeker())).unwrap();

        world.step();

        assert_eq!(world.population(), 3);
        let cells: HashSet<Cell> = world.snakes.iter().map(|s| s.head()).collect();
        assert_eq!(cells.len(), 3);
    }

    #[test]
    fn test_no_room_for_child_still_costs_energy() {
        let mut world = World::new_with_seed(empty_config(1, 2), 11).unwrap();
        let a = world.spawn_snake([Cell::new(0, 0)], 30, Some(mate_seeker())).unwrap();
        let b = world.spawn_snake([Cell::new(0, 1)], 30, Some(mate_seeker())).unwrap();

        world.step();

        assert_eq!(world.population(), 2);
        for id in [a, b] {
            let parent = world.find(id).unwrap();
            assert_eq!(parent.energy, 0);
            assert_eq!(parent.children, 0);
        }
        assert_eq!(world.last_snake_id(), b);
    }

    #[test]
    fn test_poor_pair_does_not_reproduce() {
        let mut world = World::new_with_seed(empty_config(5, 5), 12).unwrap();
        let a = world.spawn_snake([Cell::new(2, 2)], 29, Some(mate_seeker())).unwrap();
        world.spawn_snake([Cell::new(2, 3)], 29, Some(mate_seeker())).unwrap();

        world.step();

        assert_eq!(world.population(), 2);
        assert_eq!(world.find(a).unwrap().energy, 24);
    }

    #[test]
    fn test_first_adjacent_partner_wins() {
        let mut world = World::new_with_seed(empty_config(5, 5), 21).unwrap();
        // b touches a and c; e touches only a
        let a = world.spawn_snake([Cell::new(2, 2)], 100, None).unwrap();
        let b = world.spawn_snake([Cell::new(2, 3)], 100, None).unwrap();
        let c = world.spawn_snake([Cell::new(2, 4)], 100, None).unwrap();
        let e = world.spawn_snake([Cell::new(1, 2)], 100, None).unwrap();

        let offspring = world.handle_reproduction(&[None; 4]);

        assert_eq!(offspring.len(), 1);
        assert_eq!(offspring[0].id, e + 1);
        assert_eq!(world.population(), 4);
        for id in [a, b] {
            let parent = world.find(id).unwrap();
            assert_eq!(parent.children, 1);
            assert_eq!(parent.energy, 75);
        }
        for id in [c, e] {
            let single = world.find(id).unwrap();
            assert_eq!(single.children, 0);
            assert_eq!(single.energy, 100);
        }
    }

    #[test]
    fn test_failed_energy_check_keeps_scanning() {
        let mut world = World::new_with_seed(empty_config(5, 5), 22).unwrap();
        let a = world.spawn_snake([Cell::new(2, 2)], 100, None).unwrap();
        let poor = world.spawn_snake([Cell::new(2, 3)], 10, None).unwrap();
        let e = world.spawn_snake([Cell::new(1, 2)], 100, None).unwrap();

        let offspring = world.handle_reproduction(&[None; 3]);

        assert_eq!(offspring.len(), 1);
        assert_eq!(world.find(a).unwrap().children, 1);
        assert_eq!(world.find(e).unwrap().children, 1);
        // Not charged: the energy check failed before any payment
        assert_eq!(world.find(poor).unwrap().energy, 10);
        assert_eq!(world.find(poor).unwrap().children, 0);
    }

    #[test]
    fn test_doomed_snakes_do_not_breed() {
        let mut world = World::new_with_seed(empty_config(5, 5), 23).unwrap();
        let a = world.spawn_snake([Cell::new(2, 2)], 100, None).unwrap();
        world.spawn_snake([Cell::new(2, 3)], 100, None).unwrap();

        let offspring = world.handle_reproduction(&[None, Some(DeathCause::WallCollision)]);

        assert!(offspring.is_empty());
        assert_eq!(world.find(a).unwrap().energy, 100);
    }

    #[test]
    fn test_newborn_waits_for_next_tick() {
        let mut world = World::new_with_seed(empty_config(5, 5), 24).unwrap();
        world.spawn_snake([Cell::new(2, 2)], 30, Some(mate_seeker())).unwrap();
        let b = world.spawn_snake([Cell::new(2, 3)], 30, Some(mate_seeker())).unwrap();

        world.step();

        assert_eq!(world.population(), 3);
        let child = world.find(b + 1).unwrap();
        // Neither moved nor paired in the tick it was born
        assert_eq!(child.age, 0);
        assert_eq!(child.energy, 50);
        assert_eq!(child.children, 0);
        assert_eq!(child.len(), 1);
        assert_eq!(world.last_snake_id(), b + 1);
    }

    /// U-shaped snake whose head at (2, 2) can move down onto its own body at (2, 3)
    fn coiled_body() -> Vec<Cell> {
        vec![
            Cell::new(2, 2),
            Cell::new(3, 2),
            Cell::new(3, 3),
            Cell::new(2, 3),
            Cell::new(1, 3),
        ]
    }

    #[test]
    fn test_self_collision_is_not_fatal() {
        let mut world = World::new_with_seed(empty_config(10, 10), 25).unwrap();
        let id = world.spawn_snake(coiled_body(), 100, Some(forager())).unwrap();
        // Beyond the body, so the hungry snake heads down and does not eat
        world.food.insert(Cell::new(2, 4));

        world.step();

        assert!(world.last_deaths.is_empty());
        let snake = world.find(id).unwrap();
        assert!(snake.bites_itself());
        assert_eq!(
            snake.body.iter().copied().collect::<Vec<_>>(),
            vec![
                Cell::new(2, 3),
                Cell::new(2, 2),
                Cell::new(3, 2),
                Cell::new(3, 3),
                Cell::new(2, 3),
            ]
        );
        assert_eq!(snake.energy, 95);
        assert_eq!(snake.age, 1);
        assert_eq!(snake.food_eaten, 0);
        assert!(world.food.contains(Cell::new(2, 4)));
    }

    #[test]
    fn test_self_collision_while_eating_is_not_fatal() {
        let mut world = World::new_with_seed(empty_config(10, 10), 26).unwrap();
        let id = world.spawn_snake(coiled_body(), 100, Some(forager())).unwrap();
        world.food.insert(Cell::new(2, 3));

        world.step();

        assert!(world.last_deaths.is_empty());
        let snake = world.find(id).unwrap();
        assert!(snake.bites_itself());
        assert_eq!(snake.len(), 6);
        assert_eq!(snake.head(), Cell::new(2, 3));
        assert_eq!(snake.body[5], Cell::new(1, 3));
        assert_eq!(snake.energy, 145);
        assert_eq!(snake.food_eaten, 1);
        assert!(!world.food.contains(Cell::new(2, 3)));
    }

    #[test]
    fn test_food_refills_when_empty() {
        let mut world = World::new_with_seed(empty_config(10, 10), 13).unwrap();
        world.spawn_snake([Cell::new(1, 1)], 1000, None).unwrap();
        world.spawn_snake([Cell::new(8, 8)], 1000, None).unwrap();

        world.step();
        // Empty food set: min(refill_batch, population) items
        assert_eq!(world.food.len(), 2);

        world.step();
        // Below the floor: one more per tick
        assert_eq!(world.food.len(), 3);
    }

    #[test]
    fn test_no_food_added_without_snakes() {
        let mut world = World::new_with_seed(empty_config(10, 10), 14).unwrap();
        world.step();
        assert!(world.food.is_empty());
        assert_eq!(world.time, 1);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut config = test_config();
        config.evolution.reproduction_cost = 10;
        let mut world = World::new_with_seed(config, 15).unwrap();
        let mut highest = world.snakes.iter().map(|s| s.id).max().unwrap_or(0);

        for _ in 0..200 {
            let before: HashSet<SnakeId> = world.snakes.iter().map(|s| s.id).collect();
            world.step();
            for snake in &world.snakes {
                if !before.contains(&snake.id) {
                    assert!(snake.id > highest);
                    highest = snake.id;
                }
            }
        }
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let config = test_config();
        let mut world = World::new_with_seed(config.clone(), 16).unwrap();
        world.run(40);

        assert!(world.reset());
        assert_eq!(world.time, 0);
        assert_eq!(world.population(), config.snakes.initial_count);
        assert_eq!(world.food.len(), config.food.initial_count);
        assert_eq!(world.config, config);
        assert!(world.snakes.iter().all(|s| s.energy == config.snakes.initial_energy && s.age == 0));
        // Id counter restarts with the population
        assert_eq!(world.last_snake_id(), config.snakes.initial_count as SnakeId);
    }

    #[test]
    fn test_failed_reset_keeps_world() {
        let mut world = World::new_with_seed(empty_config(2, 2), 17).unwrap();
        world.spawn_snake([Cell::new(0, 0)], 100, None).unwrap();
        world.config.snakes.initial_count = 10;

        assert!(!world.reset());
        assert_eq!(world.population(), 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut world1 = World::new_with_seed(test_config(), 42).unwrap();
        let mut world2 = World::new_with_seed(test_config(), 42).unwrap();

        for _ in 0..150 {
            world1.step();
            world2.step();
        }

        assert_eq!(world1.get_state(), world2.get_state());
    }
}
