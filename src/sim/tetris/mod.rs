//! Tetris engine
//!
//! Each tick tries to move the active piece down one row; a blocked descent
//! locks the piece, clears full rows, scores and spawns the next piece.
//! Player commands are validated against the same bounds/overlap rule and
//! are silently dropped when they fail. Rotation has no wall kicks.

pub mod board;
pub mod piece;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

pub use board::Board;
pub use piece::{Piece, PieceKind, Shape};

use piece::SHAPE_MAX;

use super::command::{Command, TickInput};
use super::engine::Simulation;
use super::state::{GameKind, GamePhase, TickOutcome};
use crate::consts::*;
use crate::error::SnapshotError;
use crate::settings::Timing;

/// Drop interval for a level: shrinks by a fixed step down to a floor
pub fn drop_interval_ms(level: u32, timing: &Timing) -> u32 {
    let reduction = level
        .saturating_sub(1)
        .saturating_mul(timing.tetris_step_ms);
    timing
        .tetris_base_ms
        .saturating_sub(reduction)
        .max(timing.tetris_min_ms)
}

/// Level reached after clearing `lines` lines in total
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

/// Points for a single lock
pub fn lock_score(lines_cleared: u32, level: u32) -> u64 {
    u64::from(lines_cleared) * LINE_SCORE * u64::from(level) + LOCK_SCORE
}

/// Complete Tetris state (serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TetrisState {
    pub phase: GamePhase,
    pub board: Board,
    /// Falling piece; `None` before the first spawn and after topping out
    pub active: Option<Piece>,
    /// Preview of the piece that spawns after the next lock
    pub next: Option<PieceKind>,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    rng: Pcg32,
}

impl TetrisState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            board: Board::new(),
            active: None,
            next: None,
            score: 0,
            lines: 0,
            level: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn random_kind(&mut self) -> PieceKind {
        let index = self.rng.random_range(0..PieceKind::ALL.len());
        PieceKind::ALL[index]
    }

    /// Bring the next piece into play. Returns false when it does not fit.
    fn spawn(&mut self) -> bool {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.random_kind(),
        };
        self.next = Some(self.random_kind());

        let piece = Piece::spawn(kind);
        if self.board.fits(&piece) {
            self.active = Some(piece);
            true
        } else {
            self.active = None;
            false
        }
    }

    /// Replace the active piece if the candidate fits
    fn try_replace(&mut self, candidate: Piece) -> bool {
        if self.board.fits(&candidate) {
            self.active = Some(candidate);
            true
        } else {
            false
        }
    }

    /// Lateral move; blocked moves are no-ops
    pub fn shift(&mut self, dx: i32) -> bool {
        match self.active {
            Some(piece) => self.try_replace(piece.shifted(dx, 0)),
            None => false,
        }
    }

    /// Clockwise rotation in place; fails near walls rather than kicking
    pub fn rotate(&mut self) -> bool {
        match self.active {
            Some(piece) => self.try_replace(piece.rotated()),
            None => false,
        }
    }

    /// Descend one row, locking the piece when it cannot
    pub fn step_down(&mut self) -> (bool, TickOutcome) {
        let Some(piece) = self.active else {
            return (false, TickOutcome::NONE);
        };
        if self.try_replace(piece.shifted(0, 1)) {
            (false, TickOutcome::NONE)
        } else {
            (true, self.lock())
        }
    }

    /// Drop straight to the resting row and lock immediately
    pub fn hard_drop(&mut self) -> TickOutcome {
        let Some(mut piece) = self.active else {
            return TickOutcome::NONE;
        };
        while self.board.fits(&piece.shifted(0, 1)) {
            piece = piece.shifted(0, 1);
        }
        self.active = Some(piece);
        self.lock()
    }

    /// Row the active piece would land on (for the drop preview)
    pub fn landing_row(&self) -> Option<i32> {
        let mut piece = self.active?;
        while self.board.fits(&piece.shifted(0, 1)) {
            piece = piece.shifted(0, 1);
        }
        Some(piece.y)
    }

    fn lock(&mut self) -> TickOutcome {
        let Some(piece) = self.active.take() else {
            return TickOutcome::NONE;
        };
        self.board.place(&piece);

        let cleared = self.board.clear_full_rows();
        let delta = lock_score(cleared, self.level);
        self.score += delta;
        self.lines += cleared;

        let level = level_for_lines(self.lines);
        if level != self.level {
            log::info!("Tetris level {} -> {} ({} lines)", self.level, level, self.lines);
            self.level = level;
        }

        if self.spawn() {
            return TickOutcome {
                score_delta: delta,
                terminal: false,
            };
        }
        self.phase = GamePhase::Terminal;
        log::info!(
            "Tetris topped out: score {}, lines {}, level {}",
            self.score,
            self.lines,
            self.level
        );
        TickOutcome {
            score_delta: delta,
            terminal: true,
        }
    }

    /// Apply one player command. Returns whether it locked the piece.
    pub fn apply(&mut self, command: Command) -> (bool, TickOutcome) {
        if self.phase != GamePhase::Running {
            return (false, TickOutcome::NONE);
        }
        match command {
            Command::MoveLeft => {
                self.shift(-1);
                (false, TickOutcome::NONE)
            }
            Command::MoveRight => {
                self.shift(1);
                (false, TickOutcome::NONE)
            }
            Command::Rotate => {
                self.rotate();
                (false, TickOutcome::NONE)
            }
            Command::SoftDrop => self.step_down(),
            Command::HardDrop => (true, self.hard_drop()),
            Command::MoveUp | Command::MoveDown => (false, TickOutcome::NONE),
        }
    }
}

impl Simulation for TetrisState {
    fn kind(&self) -> GameKind {
        GameKind::Tetris
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn start(&mut self) {
        if self.phase != GamePhase::Idle {
            return;
        }
        self.phase = GamePhase::Running;
        if !self.spawn() {
            self.phase = GamePhase::Terminal;
        }
    }

    fn reset(&mut self) {
        let rng = self.rng.clone();
        *self = Self::new(0);
        self.rng = rng;
    }

    fn tick(&mut self, input: &TickInput) -> TickOutcome {
        if self.phase != GamePhase::Running {
            return TickOutcome::NONE;
        }

        let mut outcome = TickOutcome::NONE;
        for command in &input.commands {
            let (locked, result) = self.apply(*command);
            outcome.merge(result);
            if locked {
                // The fresh piece waits for the next tick
                return outcome;
            }
        }

        let (_, result) = self.step_down();
        outcome.merge(result);
        outcome
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn tick_interval_ms(&self, timing: &Timing) -> u32 {
        drop_interval_ms(self.level, timing)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        for (y, row) in self.board.rows().iter().enumerate() {
            if let Some(v) = row.iter().find(|&&v| v > 7) {
                return Err(SnapshotError::invalid(
                    "board",
                    format!("row {} holds unknown cell value {}", y, v),
                ));
            }
            if self.board.is_row_full(y) {
                return Err(SnapshotError::invalid(
                    "board",
                    format!("row {} is full but was not cleared", y),
                ));
            }
        }

        if let Some(piece) = &self.active {
            // No shape offset can bring an origin this far out back onto the board
            let reach = SHAPE_MAX as i32 - 1;
            if !(-reach..=BOARD_WIDTH as i32).contains(&piece.x)
                || !(-reach..=BOARD_HEIGHT as i32).contains(&piece.y)
            {
                return Err(SnapshotError::invalid(
                    "active",
                    format!("piece origin ({}, {}) is far outside the board", piece.x, piece.y),
                ));
            }
            if !piece.kind.orientations().contains(&piece.shape) {
                return Err(SnapshotError::invalid(
                    "active",
                    format!("shape is not an orientation of {:?}", piece.kind),
                ));
            }
            if !self.board.fits(piece) {
                return Err(SnapshotError::invalid(
                    "active",
                    "piece overlaps the stack or leaves the board",
                ));
            }
        }

        match self.phase {
            GamePhase::Running if self.active.is_none() || self.next.is_none() => {
                return Err(SnapshotError::invalid(
                    "active",
                    "a running game needs an active and a next piece",
                ));
            }
            GamePhase::Idle if self.active.is_some() || !self.board.is_empty() => {
                return Err(SnapshotError::invalid(
                    "phase",
                    "an idle game starts from an empty board",
                ));
            }
            _ => {}
        }

        if self.level != level_for_lines(self.lines) {
            return Err(SnapshotError::invalid(
                "level",
                format!("level {} does not match {} lines", self.level, self.lines),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_with(kind: PieceKind) -> TetrisState {
        let mut state = TetrisState::new(5);
        state.start();
        state.active = Some(Piece::spawn(kind));
        state
    }

    #[test]
    fn test_start_spawns_active_and_next() {
        let mut state = TetrisState::new(1);
        assert!(state.active.is_none());
        state.start();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.active.is_some());
        assert!(state.next.is_some());
        assert_eq!(state.active.map(|p| (p.x, p.y)), Some((4, 0)));
    }

    #[test]
    fn test_o_piece_locks_at_bottom() {
        let mut state = running_with(PieceKind::O);
        let idle = TickInput::default();

        for _ in 0..18 {
            assert_eq!(state.tick(&idle), TickOutcome::NONE);
        }
        assert_eq!(state.active.map(|p| p.y), Some(18));

        let outcome = state.tick(&idle);
        assert_eq!(outcome.score_delta, 10);
        assert!(!outcome.terminal);
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert!(state.board.is_occupied(x, y));
        }

        state.tick(&idle);
        assert_eq!(state.board.occupied_count(), 4);
        assert!(state.score >= 10);
    }

    #[test]
    fn test_lateral_moves_stop_at_walls() {
        let mut state = running_with(PieceKind::O);
        for _ in 0..10 {
            state.apply(Command::MoveLeft);
        }
        assert_eq!(state.active.map(|p| p.x), Some(0));
        for _ in 0..10 {
            state.apply(Command::MoveRight);
        }
        assert_eq!(state.active.map(|p| p.x), Some(8));
    }

    #[test]
    fn test_rotation_without_wall_kick() {
        let mut state = running_with(PieceKind::I);
        // Vertical I sits in column x + 2
        assert!(state.rotate());
        for _ in 0..10 {
            state.shift(1);
        }
        let piece = state.active.unwrap();
        assert_eq!(piece.x + 2, 9);
        // Horizontal again would need columns x..x+3 = 7..10
        assert!(!state.rotate());
        assert_eq!(state.active, Some(piece));
    }

    #[test]
    fn test_rotation_blocked_by_stack() {
        let mut state = running_with(PieceKind::T);
        // Block the cell the rotated T needs: (x+1, y+2)
        state.board.set(5, 2, 1);
        let before = state.active;
        assert!(!state.rotate());
        assert_eq!(state.active, before);
    }

    #[test]
    fn test_hard_drop_locks_immediately() {
        let mut state = running_with(PieceKind::O);
        let outcome = state.tick(&TickInput::with_commands(&[Command::HardDrop]));
        assert_eq!(outcome.score_delta, 10);
        assert!(state.board.is_occupied(4, 19));
        // The replacement piece was not pulled down by gravity this tick
        assert_eq!(state.active.map(|p| p.y), Some(0));
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let mut state = running_with(PieceKind::O);
        state.apply(Command::SoftDrop);
        assert_eq!(state.active.map(|p| p.y), Some(1));

        state.active = Some(Piece::spawn(PieceKind::O).shifted(0, 18));
        let (locked, outcome) = state.apply(Command::SoftDrop);
        assert!(locked);
        assert_eq!(outcome.score_delta, 10);
    }

    #[test]
    fn test_line_clear_scoring() {
        let mut state = running_with(PieceKind::I);
        // Bottom row full except columns 4..=7, where a flat I lands
        for x in [0, 1, 2, 3, 8, 9] {
            state.board.set(x, 19, 1);
        }
        let outcome = state.hard_drop();
        assert_eq!(outcome.score_delta, 100 + 10);
        assert_eq!(state.lines, 1);
        assert_eq!(state.board.occupied_count(), 0);
    }

    #[test]
    fn test_level_and_interval_progression() {
        let timing = Timing::default();
        assert_eq!(drop_interval_ms(1, &timing), 1000);
        assert_eq!(drop_interval_ms(4, &timing), 700);
        assert_eq!(drop_interval_ms(10, &timing), 100);
        assert_eq!(drop_interval_ms(25, &timing), 100);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(lock_score(2, 3), 610);
        assert_eq!(lock_score(0, 7), 10);
    }

    #[test]
    fn test_top_out_is_terminal() {
        let mut state = running_with(PieceKind::O);
        // Stack reaching the spawn rows; column 9 stays open so no row clears
        for y in 2..20 {
            for x in 2..9 {
                state.board.set(x, y, 3);
            }
        }
        state.next = Some(PieceKind::O);
        state.board.set(4, 1, 3);
        state.active = Some(Piece::spawn(PieceKind::O).shifted(-4, 0));
        let outcome = state.hard_drop();
        // O drops to rows 18..=19 in columns 0..=1, next O cannot spawn
        assert!(outcome.terminal);
        assert_eq!(state.phase, GamePhase::Terminal);
        assert!(state.active.is_none());
        assert_eq!(state.tick(&TickInput::default()), TickOutcome::NONE);
    }

    #[test]
    fn test_validate() {
        let mut state = TetrisState::new(9);
        assert!(state.validate().is_ok());
        state.start();
        assert!(state.validate().is_ok());

        let mut bad = state.clone();
        bad.level = 3;
        assert!(bad.validate().is_err());

        let mut bad = state.clone();
        let (x, y) = bad.active.unwrap().cells().next().unwrap();
        bad.board.set(x, y, 1);
        assert!(bad.validate().is_err());

        let mut bad = state.clone();
        bad.active = bad.active.map(|p| p.shifted(-10, 0));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_extreme_piece_origin() {
        let mut state = TetrisState::new(9);
        state.start();
        for (x, y) in [(i32::MAX, 0), (i32::MIN, 0), (4, i32::MAX), (4, i32::MIN), (-4, 0), (4, 21)] {
            let mut bad = state.clone();
            if let Some(piece) = bad.active.as_mut() {
                piece.x = x;
                piece.y = y;
            }
            assert!(
                matches!(bad.validate(), Err(SnapshotError::Invalid { .. })),
                "origin ({}, {})",
                x,
                y
            );
        }
    }
}
