//! Pong engine
//!
//! The player holds the left paddle up or down; the right paddle follows the
//! ball with a dead zone so it can be beaten. Contacts only count while the
//! ball is moving toward the surface, which keeps a ball that is still
//! overlapping a paddle or wall from bouncing twice.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, box_contact};
use super::command::TickInput;
use super::engine::Simulation;
use super::state::{GameKind, GamePhase, TickOutcome};
use crate::consts::*;
use crate::error::SnapshotError;
use crate::settings::Timing;

/// Which side of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Left paddle, human controlled
    Player,
    /// Right paddle, automatic
    Opponent,
}

/// A paddle; only its top edge moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub y: f32,
}

impl Paddle {
    fn centered() -> Self {
        Self {
            y: PONG_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0,
        }
    }

    pub fn center(&self) -> f32 {
        self.y + PADDLE_HEIGHT / 2.0
    }

    /// Move by `dy`, clamped to the arena
    pub fn nudge(&mut self, dy: f32) {
        self.y = (self.y + dy).clamp(0.0, PONG_HEIGHT - PADDLE_HEIGHT);
    }

    pub fn rect(&self, side: Side) -> Rect {
        let x = match side {
            Side::Player => 0.0,
            Side::Opponent => PONG_WIDTH - PADDLE_WIDTH,
        };
        Rect::new(x, self.y, PADDLE_WIDTH, PADDLE_HEIGHT)
    }
}

/// The ball (top-left corner position)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BALL_SIZE, BALL_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(BALL_SIZE / 2.0)
    }
}

/// Complete Pong state (serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PongState {
    pub phase: GamePhase,
    pub player: Paddle,
    pub opponent: Paddle,
    pub ball: Ball,
    /// Serve speed; grows with every player point up to the cap
    pub rally_speed: f32,
    pub player_score: u32,
    pub opponent_score: u32,
    rng: Pcg32,
}

impl PongState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            player: Paddle::centered(),
            opponent: Paddle::centered(),
            ball: Ball {
                pos: Vec2::new(PONG_WIDTH / 2.0, PONG_HEIGHT / 2.0),
                vel: Vec2::splat(BALL_START_SPEED),
            },
            rally_speed: BALL_START_SPEED,
            player_score: 0,
            opponent_score: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn random_vertical(&mut self) -> f32 {
        (self.rng.random::<f32>() - 0.5) * self.rally_speed
    }

    /// Put the ball back in the middle heading toward `toward`
    fn serve(&mut self, toward: Side) {
        let dir = match toward {
            Side::Player => -1.0,
            Side::Opponent => 1.0,
        };
        let vy = self.random_vertical();
        self.ball = Ball {
            pos: Vec2::new(PONG_WIDTH / 2.0, PONG_HEIGHT / 2.0),
            vel: Vec2::new(self.rally_speed * dir, vy),
        };
    }

    /// Opponent tracks the ball but ignores it inside the dead zone
    fn track_ball(&mut self) {
        let target = self.ball.center().y;
        let center = self.opponent.center();
        if center < target - OPPONENT_DEAD_ZONE {
            self.opponent.nudge(PADDLE_SPEED);
        } else if center > target + OPPONENT_DEAD_ZONE {
            self.opponent.nudge(-PADDLE_SPEED);
        }
    }

    fn bounce_walls(&mut self) {
        let ball = &mut self.ball;
        if ball.pos.y <= 0.0 && ball.vel.y < 0.0 {
            ball.vel.y = -ball.vel.y;
            ball.pos.y = 0.0;
        } else if ball.pos.y >= PONG_HEIGHT - BALL_SIZE && ball.vel.y > 0.0 {
            ball.vel.y = -ball.vel.y;
            ball.pos.y = PONG_HEIGHT - BALL_SIZE;
        }
        ball.pos.y = ball.pos.y.clamp(0.0, PONG_HEIGHT - BALL_SIZE);
    }

    /// Reflect off a paddle with an angle from the contact offset
    fn bounce_paddle(&mut self, side: Side) -> bool {
        let approaching = match side {
            Side::Player => self.ball.vel.x < 0.0,
            Side::Opponent => self.ball.vel.x > 0.0,
        };
        if !approaching {
            return false;
        }
        let paddle = match side {
            Side::Player => self.player.rect(side),
            Side::Opponent => self.opponent.rect(side),
        };
        let contact = box_contact(&self.ball.rect(), &paddle);
        if !contact.hit {
            return false;
        }
        self.ball.vel.x = -self.ball.vel.x;
        self.ball.vel.y = (contact.offset * self.rally_speed).clamp(-BALL_MAX_SPEED, BALL_MAX_SPEED);
        self.ball.pos.x = match side {
            Side::Player => paddle.right(),
            Side::Opponent => paddle.left() - BALL_SIZE,
        };
        true
    }

    fn point(&mut self, scorer: Side) -> TickOutcome {
        let delta = match scorer {
            Side::Player => {
                self.player_score += 1;
                self.rally_speed = (self.rally_speed + BALL_SPEED_STEP).min(BALL_MAX_SPEED);
                1
            }
            Side::Opponent => {
                self.opponent_score += 1;
                0
            }
        };
        log::debug!(
            "Pong point to {:?}: {} - {}",
            scorer,
            self.player_score,
            self.opponent_score
        );

        if self.player_score >= PONG_WINNING_SCORE || self.opponent_score >= PONG_WINNING_SCORE {
            self.phase = GamePhase::Terminal;
            // Park the ball mid-table; it left the arena on the winning point
            self.ball = Ball {
                pos: Vec2::new(PONG_WIDTH / 2.0, PONG_HEIGHT / 2.0),
                vel: Vec2::ZERO,
            };
            log::info!(
                "Pong over: {} - {}",
                self.player_score,
                self.opponent_score
            );
            return TickOutcome {
                score_delta: delta,
                terminal: true,
            };
        }
        self.serve(scorer);
        TickOutcome {
            score_delta: delta,
            terminal: false,
        }
    }
}

impl Simulation for PongState {
    fn kind(&self) -> GameKind {
        GameKind::Pong
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn start(&mut self) {
        // The first rally keeps the fixed opening serve
        if self.phase == GamePhase::Idle {
            self.phase = GamePhase::Running;
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

        self.player.nudge(input.hold.axis() * PADDLE_SPEED);
        self.track_ball();

        self.ball.pos += self.ball.vel;
        self.bounce_walls();
        self.bounce_paddle(Side::Player);
        self.bounce_paddle(Side::Opponent);

        if self.ball.pos.x < 0.0 {
            return self.point(Side::Opponent);
        }
        if self.ball.pos.x + BALL_SIZE > PONG_WIDTH {
            return self.point(Side::Player);
        }
        TickOutcome::NONE
    }

    fn score(&self) -> u64 {
        u64::from(self.player_score)
    }

    fn tick_interval_ms(&self, timing: &Timing) -> u32 {
        timing.pong_ms
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        for (name, paddle) in [("player", &self.player), ("opponent", &self.opponent)] {
            if !paddle.y.is_finite() || !(0.0..=PONG_HEIGHT - PADDLE_HEIGHT).contains(&paddle.y) {
                return Err(SnapshotError::invalid(
                    "paddle",
                    format!("{} paddle at y={} is outside the arena", name, paddle.y),
                ));
            }
        }

        let ball = &self.ball;
        if !ball.pos.is_finite() || !ball.vel.is_finite() {
            return Err(SnapshotError::invalid("ball", "non-finite position or velocity"));
        }
        let arena = Rect::new(0.0, 0.0, PONG_WIDTH, PONG_HEIGHT);
        if !arena.contains(&ball.rect()) {
            return Err(SnapshotError::invalid(
                "ball",
                format!("ball at ({}, {}) is outside the arena", ball.pos.x, ball.pos.y),
            ));
        }
        if ball.vel.x.abs() > BALL_MAX_SPEED || ball.vel.y.abs() > BALL_MAX_SPEED {
            return Err(SnapshotError::invalid("ball", "velocity exceeds the speed cap"));
        }
        if !(BALL_START_SPEED..=BALL_MAX_SPEED).contains(&self.rally_speed) {
            return Err(SnapshotError::invalid(
                "rally_speed",
                format!("{} is outside {}..={}", self.rally_speed, BALL_START_SPEED, BALL_MAX_SPEED),
            ));
        }

        let decided = self.player_score >= PONG_WINNING_SCORE || self.opponent_score >= PONG_WINNING_SCORE;
        if self.player_score > PONG_WINNING_SCORE || self.opponent_score > PONG_WINNING_SCORE {
            return Err(SnapshotError::invalid("score", "score beyond the winning total"));
        }
        if decided != (self.phase == GamePhase::Terminal) {
            return Err(SnapshotError::invalid(
                "phase",
                format!(
                    "{:?} does not match score {} - {}",
                    self.phase, self.player_score, self.opponent_score
                ),
            ));
        }
        Ok(())
    }
}
