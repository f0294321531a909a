//! Shared game state vocabulary
//!
//! Every engine speaks in these terms: which game it is, which phase it is
//! in, and what a tick produced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which game an engine (or snapshot) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameKind {
    #[serde(rename = "snake-game")]
    Snake,
    #[serde(rename = "pong-game")]
    Pong,
    #[serde(rename = "tetris-game")]
    Tetris,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Snake, GameKind::Pong, GameKind::Tetris];

    /// Catalog id shared with the save and leaderboard services
    pub fn id(&self) -> &'static str {
        match self {
            GameKind::Snake => "snake-game",
            GameKind::Pong => "pong-game",
            GameKind::Tetris => "tetris-game",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Snake => "Snake",
            GameKind::Pong => "Pong",
            GameKind::Tetris => "Tetris",
        }
    }

    /// Canvas size in pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        use crate::consts::*;
        match self {
            GameKind::Snake => (
                SNAKE_COLS as u32 * SNAKE_CELL,
                SNAKE_ROWS as u32 * SNAKE_CELL,
            ),
            GameKind::Pong => (PONG_WIDTH as u32, PONG_HEIGHT as u32),
            GameKind::Tetris => (
                BOARD_WIDTH as u32 * TETRIS_CELL,
                BOARD_HEIGHT as u32 * TETRIS_CELL,
            ),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snake-game" | "snake" => Ok(GameKind::Snake),
            "pong-game" | "pong" => Ok(GameKind::Pong),
            "tetris-game" | "tetris" => Ok(GameKind::Tetris),
            other => Err(format!("unknown game: {other}")),
        }
    }
}

/// Lifecycle of a game: Idle -> Running -> Terminal, back to Idle only by reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Initial layout shown, no ticking
    #[default]
    Idle,
    /// Ticks advance the simulation
    Running,
    /// Game ended; only reset leaves this phase
    Terminal,
}

/// What a tick (or directly applied command) produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Points gained this tick
    pub score_delta: u64,
    /// True only on the tick that entered `Terminal`
    pub terminal: bool,
}

impl TickOutcome {
    pub const NONE: TickOutcome = TickOutcome {
        score_delta: 0,
        terminal: false,
    };

    /// Fold another outcome into this one
    pub fn merge(&mut self, other: TickOutcome) {
        self.score_delta += other.score_delta;
        self.terminal |= other.terminal;
    }
}
