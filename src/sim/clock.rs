//! Fixed-interval tick scheduler
//!
//! The host calls [`Scheduler::advance`] once per animation frame with the
//! elapsed wall time; the scheduler accumulates it and reports how many
//! fixed ticks are due. Rendering runs every frame regardless, so the
//! simulation rate and the paint rate stay decoupled.
//!
//! The scheduler is owned by a session. There is no global timer.

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS};

#[derive(Debug, Clone, PartialEq)]
pub struct Scheduler {
    /// Interval restored by `reset`
    base_interval_ms: u32,
    /// Current interval (Tetris shortens it as the level rises)
    interval_ms: u32,
    running: bool,
    accumulator_ms: f64,
    /// Ticks fired since the last reset
    ticks: u64,
}

impl Scheduler {
    pub fn new(interval_ms: u32) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            base_interval_ms: interval_ms,
            interval_ms,
            running: false,
            accumulator_ms: 0.0,
            ticks: 0,
        }
    }

    /// Begin firing ticks. Starting a running scheduler does nothing.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.accumulator_ms = 0.0;
        }
    }

    /// Halt ticking. Safe to call at any time, any number of times.
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator_ms = 0.0;
    }

    /// Stop and return to the configured base interval
    pub fn reset(&mut self) {
        self.stop();
        self.interval_ms = self.base_interval_ms;
        self.ticks = 0;
    }

    pub fn set_interval(&mut self, interval_ms: u32) {
        let interval_ms = interval_ms.max(1);
        if interval_ms != self.interval_ms {
            log::debug!("tick interval {} -> {} ms", self.interval_ms, interval_ms);
            self.interval_ms = interval_ms;
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn base_interval_ms(&self) -> u32 {
        self.base_interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Accumulate elapsed time and return the number of ticks due now.
    ///
    /// At most [`MAX_SUBSTEPS`] ticks are reported per call; a stopped
    /// scheduler always reports zero.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if !self.running || !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return 0;
        }
        self.accumulator_ms += elapsed_ms.min(MAX_FRAME_MS);

        let interval = f64::from(self.interval_ms);
        let mut due = 0;
        while self.accumulator_ms >= interval && due < MAX_SUBSTEPS {
            self.accumulator_ms -= interval;
            due += 1;
        }
        if due == MAX_SUBSTEPS {
            // Drop the backlog rather than replaying it next frame
            self.accumulator_ms = self.accumulator_ms.min(interval);
        }
        self.ticks += u64::from(due);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_scheduler_is_inert() {
        let mut clock = Scheduler::new(150);
        assert_eq!(clock.advance(1000.0), 0);
        assert_eq!(clock.ticks(), 0);
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = Scheduler::new(100);
        clock.start();
        assert_eq!(clock.advance(60.0), 0);
        assert_eq!(clock.advance(60.0), 1);
        assert_eq!(clock.advance(80.0), 1);
        assert_eq!(clock.ticks(), 2);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut clock = Scheduler::new(16);
        clock.start();
        assert_eq!(clock.advance(10_000.0), MAX_SUBSTEPS);
        // Backlog beyond one interval was discarded
        assert!(clock.advance(0.5) <= 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = Scheduler::new(150);
        clock.start();
        clock.advance(100.0);

        clock.stop();
        let once = clock.clone();
        clock.stop();
        assert_eq!(clock, once);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_start_twice_keeps_accumulator() {
        let mut clock = Scheduler::new(100);
        clock.start();
        clock.advance(90.0);
        clock.start();
        assert_eq!(clock.advance(10.0), 1);
    }

    #[test]
    fn test_reset_restores_base_interval() {
        let mut clock = Scheduler::new(1000);
        clock.start();
        clock.set_interval(300);
        assert_eq!(clock.interval_ms(), 300);

        clock.reset();
        assert_eq!(clock.interval_ms(), 1000);
        assert!(!clock.is_running());
        assert_eq!(clock.ticks(), 0);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut clock = Scheduler::new(0);
        clock.start();
        assert_eq!(clock.interval_ms(), 1);
        assert_eq!(clock.advance(3.0), 3);
    }
}
