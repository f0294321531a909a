//! Snake engine
//!
//! The head advances one cell per tick in the current direction. Walls are
//! checked first, then the whole body (tail included). Eating grows the
//! snake by skipping the tail pop for that tick.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::command::{Command, TickInput};
use super::engine::Simulation;
use super::state::{GameKind, GamePhase, TickOutcome};
use crate::consts::*;
use crate::error::SnapshotError;
use crate::settings::Timing;

/// A grid cell (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(&self) -> bool {
        (0..SNAKE_COLS).contains(&self.x) && (0..SNAKE_ROWS).contains(&self.y)
    }

    fn step(&self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    fn is_adjacent(&self, other: &Cell) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// Heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn from_command(command: Command) -> Option<Direction> {
        match command {
            Command::MoveUp => Some(Direction::Up),
            Command::MoveDown => Some(Direction::Down),
            Command::MoveLeft => Some(Direction::Left),
            Command::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Command {
        match self {
            Direction::Up => Command::MoveUp,
            Direction::Down => Command::MoveDown,
            Direction::Left => Command::MoveLeft,
            Direction::Right => Command::MoveRight,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Complete Snake state (serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    pub phase: GamePhase,
    /// Body segments, head first
    pub body: VecDeque<Cell>,
    pub direction: Direction,
    pub food: Cell,
    pub score: u64,
    /// Respawn food only on free cells (off: any cell, body included)
    #[serde(skip, default = "default_true")]
    pub food_avoids_body: bool,
    rng: Pcg32,
}

impl SnakeState {
    pub fn new(seed: u64) -> Self {
        let (x, y) = SNAKE_START;
        let (fx, fy) = SNAKE_START_FOOD;
        Self {
            phase: GamePhase::Idle,
            body: VecDeque::from([Cell::new(x, y)]),
            direction: Direction::Up,
            food: Cell::new(fx, fy),
            score: 0,
            food_avoids_body: true,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn head(&self) -> Cell {
        // body is never empty: constructed with one segment, only grows,
        // and validation rejects empty snapshots
        self.body[0]
    }

    /// Turn toward `dir` unless it reverses the current heading
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.direction = dir;
        true
    }

    fn free_cells(&self) -> Vec<Cell> {
        let mut free = Vec::with_capacity((SNAKE_COLS * SNAKE_ROWS) as usize);
        for y in 0..SNAKE_ROWS {
            for x in 0..SNAKE_COLS {
                let cell = Cell::new(x, y);
                if !self.body.contains(&cell) {
                    free.push(cell);
                }
            }
        }
        free
    }

    /// Draw a new food cell. Returns false when no free cell is left.
    fn respawn_food(&mut self) -> bool {
        if !self.food_avoids_body {
            self.food = Cell::new(
                self.rng.random_range(0..SNAKE_COLS),
                self.rng.random_range(0..SNAKE_ROWS),
            );
            return true;
        }
        let free = self.free_cells();
        if free.is_empty() {
            return false;
        }
        self.food = free[self.rng.random_range(0..free.len())];
        true
    }

    fn finish(&mut self, reason: &str) -> TickOutcome {
        self.phase = GamePhase::Terminal;
        log::info!("Snake over ({}): score {}, length {}", reason, self.score, self.body.len());
        TickOutcome {
            score_delta: 0,
            terminal: true,
        }
    }
}

impl Simulation for SnakeState {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn start(&mut self) {
        if self.phase == GamePhase::Idle {
            self.phase = GamePhase::Running;
        }
    }

    fn reset(&mut self) {
        let rng = self.rng.clone();
        let food_avoids_body = self.food_avoids_body;
        *self = Self::new(0);
        self.rng = rng;
        self.food_avoids_body = food_avoids_body;
    }

    fn tick(&mut self, input: &TickInput) -> TickOutcome {
        if self.phase != GamePhase::Running {
            return TickOutcome::NONE;
        }

        // Turns are gated against the heading at tick start; the last one wins
        let heading = self.direction;
        if let Some(dir) = input
            .commands
            .iter()
            .filter_map(|c| Direction::from_command(*c))
            .filter(|d| *d != heading.opposite())
            .last()
        {
            self.steer(dir);
        }

        let next = self.head().step(self.direction);
        if !next.in_bounds() {
            return self.finish("wall");
        }
        if self.body.contains(&next) {
            return self.finish("self");
        }

        self.body.push_front(next);
        if next == self.food {
            self.score += SNAKE_FOOD_SCORE;
            if !self.respawn_food() {
                let mut outcome = self.finish("board full");
                outcome.score_delta = SNAKE_FOOD_SCORE;
                return outcome;
            }
            TickOutcome {
                score_delta: SNAKE_FOOD_SCORE,
                terminal: false,
            }
        } else {
            self.body.pop_back();
            TickOutcome::NONE
        }
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn tick_interval_ms(&self, timing: &Timing) -> u32 {
        timing.snake_ms
    }

    fn heading(&self) -> Option<Command> {
        Some(self.direction.as_command())
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        if self.body.is_empty() {
            return Err(SnapshotError::invalid("body", "snake has no segments"));
        }
        for (i, seg) in self.body.iter().enumerate() {
            if !seg.in_bounds() {
                return Err(SnapshotError::invalid(
                    "body",
                    format!("segment {} at ({}, {}) is outside the grid", i, seg.x, seg.y),
                ));
            }
            if self.body.iter().skip(i + 1).any(|other| other == seg) {
                return Err(SnapshotError::invalid(
                    "body",
                    format!("segments overlap at ({}, {})", seg.x, seg.y),
                ));
            }
        }
        if let Some(pair) = self
            .body
            .iter()
            .zip(self.body.iter().skip(1))
            .find(|(a, b)| !a.is_adjacent(b))
        {
            return Err(SnapshotError::invalid(
                "body",
                format!("segments ({}, {}) and ({}, {}) are not adjacent", pair.0.x, pair.0.y, pair.1.x, pair.1.y),
            ));
        }
        if !self.food.in_bounds() {
            return Err(SnapshotError::invalid("food", "food is outside the grid"));
        }
        if self.score % SNAKE_FOOD_SCORE != 0
            || self.body.len() as u64 != 1 + self.score / SNAKE_FOOD_SCORE
        {
            return Err(SnapshotError::invalid(
                "score",
                format!("score {} does not match length {}", self.score, self.body.len()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(seed: u64) -> SnakeState {
        let mut state = SnakeState::new(seed);
        state.start();
        state
    }

    #[test]
    fn test_first_tick_moves_up() {
        let mut state = running(1);
        assert_eq!(state.head(), Cell::new(10, 10));
        assert_eq!(state.food, Cell::new(5, 5));

        let outcome = state.tick(&TickInput::default());
        assert_eq!(state.head(), Cell::new(10, 9));
        assert_eq!(state.score, 0);
        assert_eq!(outcome, TickOutcome::NONE);
        assert_eq!(state.body.len(), 1);
    }

    #[test]
    fn test_idle_ignores_ticks() {
        let mut state = SnakeState::new(1);
        state.tick(&TickInput::default());
        assert_eq!(state.head(), Cell::new(10, 10));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut state = running(1);
        state.tick(&TickInput::with_commands(&[Command::MoveDown]));
        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.head(), Cell::new(10, 9));
    }

    #[test]
    fn test_last_perpendicular_turn_wins() {
        let mut state = running(1);
        state.tick(&TickInput::with_commands(&[
            Command::MoveLeft,
            Command::MoveDown,
            Command::MoveRight,
        ]));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.head(), Cell::new(11, 10));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut state = running(7);
        state.food = Cell::new(10, 9);

        let outcome = state.tick(&TickInput::default());
        assert_eq!(outcome.score_delta, 10);
        assert_eq!(state.score, 10);
        assert_eq!(state.body.len(), 2);
        assert_ne!(state.food, Cell::new(10, 9));
        assert!(!state.body.contains(&state.food));

        // Next tick keeps the length constant
        state.food = Cell::new(0, 0);
        state.tick(&TickInput::default());
        assert_eq!(state.body.len(), 2);
        assert_eq!(state.head(), Cell::new(10, 8));
    }

    #[test]
    fn test_wall_collision_is_terminal() {
        let mut state = running(1);
        state.body = VecDeque::from([Cell::new(10, 0)]);

        let outcome = state.tick(&TickInput::default());
        assert!(outcome.terminal);
        assert_eq!(state.phase, GamePhase::Terminal);
        // Body left as it was before the fatal move
        assert_eq!(state.head(), Cell::new(10, 0));

        // Terminal ignores further ticks
        assert_eq!(state.tick(&TickInput::default()), TickOutcome::NONE);
    }

    #[test]
    fn test_self_collision_is_terminal() {
        let mut state = running(1);
        // Head at (5,5) heading left into its own body curling below
        state.body = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(5, 6),
            Cell::new(4, 6),
            Cell::new(4, 5),
        ]);
        state.direction = Direction::Left;

        let outcome = state.tick(&TickInput::default());
        assert!(outcome.terminal);
        assert_eq!(state.phase, GamePhase::Terminal);
    }

    #[test]
    fn test_reset_returns_to_idle_layout() {
        let mut state = running(3);
        state.food = Cell::new(10, 9);
        state.tick(&TickInput::default());

        state.reset();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.body, VecDeque::from([Cell::new(10, 10)]));
        assert_eq!(state.score, 0);
        assert_eq!(state.food, Cell::new(5, 5));
    }

    #[test]
    fn test_food_never_lands_on_body() {
        let mut state = running(42);
        // Long snake filling most of row 3..=14
        state.body.clear();
        for y in (3..SNAKE_ROWS).rev() {
            let xs: Vec<i32> = if y % 2 == 0 {
                (0..SNAKE_COLS).collect()
            } else {
                (0..SNAKE_COLS).rev().collect()
            };
            for x in xs {
                state.body.push_front(Cell::new(x, y));
            }
        }
        for _ in 0..50 {
            assert!(state.respawn_food());
            assert!(!state.body.contains(&state.food));
        }
    }

    #[test]
    fn test_validate_rejects_broken_bodies() {
        let mut state = SnakeState::new(1);
        assert!(state.validate().is_ok());

        state.body.push_back(Cell::new(12, 10));
        state.score = 10;
        assert!(state.validate().is_err());

        state.body = VecDeque::from([Cell::new(10, 10), Cell::new(10, 11)]);
        assert!(state.validate().is_ok());

        state.score = 0;
        assert!(state.validate().is_err());
    }
}
