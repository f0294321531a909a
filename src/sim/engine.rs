//! The simulation capability shared by all games
//!
//! Each game owns its full state type and implements [`Simulation`]. A
//! session holds an [`Engine`], the tagged union of the three, picked by
//! [`GameKind`] when the session is created.

use serde::{Deserialize, Serialize};

use super::command::{Command, TickInput};
use super::pong::PongState;
use super::snake::SnakeState;
use super::state::{GameKind, GamePhase, TickOutcome};
use super::tetris::TetrisState;
use crate::error::SnapshotError;
use crate::settings::Timing;

/// A tick-driven game simulation
pub trait Simulation {
    fn kind(&self) -> GameKind;

    fn phase(&self) -> GamePhase;

    /// Idle -> Running; no effect in any other phase
    fn start(&mut self);

    /// Back to the static Idle layout (the random stream continues)
    fn reset(&mut self);

    /// Consume one tick's input and advance the simulation.
    ///
    /// Ticks outside `Running` change nothing and return
    /// [`TickOutcome::NONE`].
    fn tick(&mut self, input: &TickInput) -> TickOutcome;

    /// Score reported to the leaderboard
    fn score(&self) -> u64;

    /// Interval the scheduler should tick at for the current state
    fn tick_interval_ms(&self, timing: &Timing) -> u32;

    /// Current heading, for direction gating in the input queue
    fn heading(&self) -> Option<Command> {
        None
    }

    /// Check the engine invariants on a state that did not come from ticking
    fn validate(&self) -> Result<(), SnapshotError>;
}

/// One engine per game, selected by tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", content = "state")]
pub enum Engine {
    #[serde(rename = "snake-game")]
    Snake(SnakeState),
    #[serde(rename = "pong-game")]
    Pong(PongState),
    #[serde(rename = "tetris-game")]
    Tetris(TetrisState),
}

impl Engine {
    pub fn new(kind: GameKind, seed: u64) -> Self {
        match kind {
            GameKind::Snake => Engine::Snake(SnakeState::new(seed)),
            GameKind::Pong => Engine::Pong(PongState::new(seed)),
            GameKind::Tetris => Engine::Tetris(TetrisState::new(seed)),
        }
    }

    fn inner(&self) -> &dyn Simulation {
        match self {
            Engine::Snake(s) => s,
            Engine::Pong(s) => s,
            Engine::Tetris(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Simulation {
        match self {
            Engine::Snake(s) => s,
            Engine::Pong(s) => s,
            Engine::Tetris(s) => s,
        }
    }
}

impl Simulation for Engine {
    fn kind(&self) -> GameKind {
        self.inner().kind()
    }

    fn phase(&self) -> GamePhase {
        self.inner().phase()
    }

    fn start(&mut self) {
        self.inner_mut().start();
    }

    fn reset(&mut self) {
        self.inner_mut().reset();
    }

    fn tick(&mut self, input: &TickInput) -> TickOutcome {
        self.inner_mut().tick(input)
    }

    fn score(&self) -> u64 {
        self.inner().score()
    }

    fn tick_interval_ms(&self, timing: &Timing) -> u32 {
        self.inner().tick_interval_ms(timing)
    }

    fn heading(&self) -> Option<Command> {
        self.inner().heading()
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        self.inner().validate()
    }
}
