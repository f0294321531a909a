//! One running game
//!
//! A session owns its engine, input queue and scheduler exclusively. The
//! host feeds it key events and frame times; it ticks the engine, projects
//! frames and talks to the save and leaderboard collaborators. Collaborator
//! failures come back as errors and never touch the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LeaderboardError, PersistenceError, SnapshotError};
use crate::highscores::{Leaderboard, Submission};
use crate::persistence::{SaveRecord, SaveSlot, SaveStore};
use crate::platform::{KeyEvent, map_key};
use crate::renderer::{self, Frame};
use crate::settings::Settings;
use crate::sim::{
    self, CommandQueue, Engine, GameKind, GamePhase, Scheduler, Simulation, Snapshot,
};

/// Owner identity for saves and scores
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Identity used when nobody is signed in
    pub const ANONYMOUS: &'static str = "demo-user";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn anonymous() -> Self {
        Self::new(Self::ANONYMOUS)
    }

    /// Use the authenticated owner when there is one
    pub fn or_anonymous(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.trim().is_empty() => Self::new(id.trim()),
            _ => Self::anonymous(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == Self::ANONYMOUS
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happened during one host frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Engine ticks run this frame
    pub ticks: u32,
    pub score_delta: u64,
    /// The game ended during this frame
    pub terminal: bool,
}

pub struct GameSession {
    kind: GameKind,
    engine: Engine,
    queue: CommandQueue,
    clock: Scheduler,
    settings: Settings,
    /// Score already sent for the current terminal game
    score_submitted: bool,
}

impl GameSession {
    pub fn new(kind: GameKind, seed: u64, settings: &Settings) -> Self {
        let mut engine = Engine::new(kind, seed);
        apply_engine_settings(&mut engine, settings);
        let clock = Scheduler::new(engine.tick_interval_ms(&settings.timing));
        log::info!("New {} session (seed {})", kind, seed);
        Self {
            kind,
            engine,
            queue: CommandQueue::new(),
            clock,
            settings: settings.clone(),
            score_submitted: false,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn phase(&self) -> GamePhase {
        self.engine.phase()
    }

    pub fn score(&self) -> u64 {
        self.engine.score()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.clock
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap settings; intervals and palette apply from the next frame
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
        apply_engine_settings(&mut self.engine, settings);
        self.clock
            .set_interval(self.engine.tick_interval_ms(&self.settings.timing));
    }

    /// Feed a key transition. Returns whether it mapped to an accepted command.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if event.pressed {
            self.press(event)
        } else {
            self.release(event)
        }
    }

    pub fn press(&mut self, event: &KeyEvent) -> bool {
        let Some(command) = map_key(self.kind, &event.key) else {
            return false;
        };
        if self.kind == GameKind::Pong {
            self.queue.hold(command);
            return true;
        }
        self.queue.set_heading(self.engine.heading());
        self.queue.push(command)
    }

    pub fn release(&mut self, event: &KeyEvent) -> bool {
        match map_key(self.kind, &event.key) {
            Some(command) if self.kind == GameKind::Pong => {
                self.queue.release(command);
                true
            }
            _ => false,
        }
    }

    /// Start (or resume) the game. A finished game must be reset first.
    pub fn start(&mut self) {
        self.engine.start();
        if self.engine.phase() == GamePhase::Running {
            self.clock.start();
        }
    }

    /// Pause ticking; the last committed state stays as it is
    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.queue.clear();
        self.clock.reset();
        self.clock
            .set_interval(self.engine.tick_interval_ms(&self.settings.timing));
        self.score_submitted = false;
    }

    /// Advance by one host frame of `elapsed_ms`
    pub fn frame(&mut self, elapsed_ms: f64) -> FrameReport {
        let due = self.clock.advance(elapsed_ms);
        let mut report = FrameReport::default();
        for _ in 0..due {
            self.queue.set_heading(self.engine.heading());
            let input = self.queue.drain();
            let outcome = self.engine.tick(&input);
            report.ticks += 1;
            report.score_delta += outcome.score_delta;

            if outcome.terminal {
                report.terminal = true;
                self.clock.stop();
                log::info!("{} over with score {}", self.kind, self.engine.score());
                break;
            }
            self.clock
                .set_interval(self.engine.tick_interval_ms(&self.settings.timing));
        }
        report
    }

    pub fn project(&self) -> Frame {
        renderer::project(&self.engine, &self.settings)
    }

    pub fn snapshot(&self) -> Snapshot {
        sim::snapshot(&self.engine)
    }

    /// Replace the engine with a validated snapshot. On error the session is
    /// untouched. The scheduler is left stopped.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        if snapshot.game() != self.kind {
            return Err(SnapshotError::WrongGame {
                expected: self.kind,
                found: snapshot.game(),
            });
        }
        let mut engine = sim::restore(snapshot).inspect_err(|e| {
            log::warn!("Rejected {} snapshot: {}", self.kind, e);
        })?;
        apply_engine_settings(&mut engine, &self.settings);

        self.engine = engine;
        self.queue.clear();
        self.clock.stop();
        self.clock
            .set_interval(self.engine.tick_interval_ms(&self.settings.timing));
        self.score_submitted = false;
        log::info!("Restored {} at score {}", self.kind, self.engine.score());
        Ok(())
    }

    pub fn save_to(
        &self,
        store: &mut impl SaveStore,
        owner: &PlayerId,
        slot: SaveSlot,
        name: Option<&str>,
    ) -> Result<(), PersistenceError> {
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => slot.default_name(),
        };
        store.save(
            owner,
            SaveRecord {
                game: self.kind,
                slot,
                name,
                score: self.engine.score(),
                snapshot: self.snapshot(),
            },
        )
    }

    pub fn load_from(
        &mut self,
        store: &impl SaveStore,
        owner: &PlayerId,
        slot: SaveSlot,
    ) -> Result<(), PersistenceError> {
        let record = store.load(owner, self.kind, slot)?;
        self.restore(record.snapshot)?;
        Ok(())
    }

    /// Send the final score once the game is over. Returns `None` while the
    /// game is still going or after the score has already been sent.
    pub fn submit_score(
        &mut self,
        board: &mut impl Leaderboard,
        owner: &PlayerId,
    ) -> Result<Option<Submission>, LeaderboardError> {
        if self.engine.phase() != GamePhase::Terminal || self.score_submitted {
            return Ok(None);
        }
        let submission = board.submit_score(self.kind, owner, self.engine.score())?;
        self.score_submitted = true;
        Ok(Some(submission))
    }
}

fn apply_engine_settings(engine: &mut Engine, settings: &Settings) {
    if let Engine::Snake(state) = engine {
        state.food_avoids_body = settings.snake_food_avoids_body;
    }
}
