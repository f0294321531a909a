//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, carried inside the engine state
//! - Commands consumed once per tick
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod command;
pub mod engine;
pub mod pong;
pub mod snake;
pub mod snapshot;
pub mod state;
pub mod tetris;

pub use clock::Scheduler;
pub use collision::{CollisionResult, Rect, box_contact};
pub use command::{Command, CommandQueue, HoldState, TickInput};
pub use engine::{Engine, Simulation};
pub use pong::{Ball, Paddle, PongState, Side};
pub use snake::{Cell, Direction, SnakeState};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot, restore, snapshot};
pub use state::{GameKind, GamePhase, TickOutcome};
pub use tetris::{Board, Piece, PieceKind, Shape, TetrisState};
