//! Retro Arcade - Snake, Pong and Tetris on a canvas
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, input queue, engines, snapshots)
//! - `renderer`: Pure projection from engine state to draw rectangles and text
//! - `platform`: Browser key mapping and LocalStorage access
//! - `persistence`: Save slots (per owner, per game, slots 1..=10)
//! - `highscores`: Per-game leaderboards
//! - `session`: One running game wiring the pieces together

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{LeaderboardError, PersistenceError, SettingsError, SnapshotError};
pub use highscores::{HighScores, Leaderboard, LocalLeaderboard};
pub use session::{FrameReport, GameSession, PlayerId};
pub use settings::{Palette, Settings};

/// Game configuration constants
pub mod consts {
    /// Maximum ticks run for a single frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame deltas above this are treated as a stall (tab hidden, debugger)
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Snake grid (20 px cells on a 400x300 canvas)
    pub const SNAKE_CELL: u32 = 20;
    pub const SNAKE_COLS: i32 = 20;
    pub const SNAKE_ROWS: i32 = 15;
    pub const SNAKE_START: (i32, i32) = (10, 10);
    pub const SNAKE_START_FOOD: (i32, i32) = (5, 5);
    pub const SNAKE_FOOD_SCORE: u64 = 10;
    pub const SNAKE_INTERVAL_MS: u32 = 150;

    /// Pong arena
    pub const PONG_WIDTH: f32 = 400.0;
    pub const PONG_HEIGHT: f32 = 300.0;
    pub const PADDLE_WIDTH: f32 = 8.0;
    pub const PADDLE_HEIGHT: f32 = 40.0;
    pub const PADDLE_SPEED: f32 = 5.0;
    pub const BALL_SIZE: f32 = 8.0;
    pub const BALL_START_SPEED: f32 = 3.0;
    /// Rally speed-up per point
    pub const BALL_SPEED_STEP: f32 = 0.2;
    pub const BALL_MAX_SPEED: f32 = 8.0;
    /// Opponent ignores the ball while it is within this band of paddle center
    pub const OPPONENT_DEAD_ZONE: f32 = 20.0;
    pub const PONG_WINNING_SCORE: u32 = 10;
    /// ~60 FPS
    pub const PONG_INTERVAL_MS: u32 = 16;

    /// Tetris board
    pub const TETRIS_CELL: u32 = 20;
    pub const BOARD_WIDTH: usize = 10;
    pub const BOARD_HEIGHT: usize = 20;
    pub const LINES_PER_LEVEL: u32 = 10;
    pub const LINE_SCORE: u64 = 100;
    pub const LOCK_SCORE: u64 = 10;
    pub const TETRIS_BASE_INTERVAL_MS: u32 = 1000;
    pub const TETRIS_INTERVAL_STEP_MS: u32 = 100;
    pub const TETRIS_MIN_INTERVAL_MS: u32 = 100;
}
