//! Input command queue
//!
//! Raw key events are mapped to [`Command`]s (see `platform::keys`) and
//! queued here until the next tick drains them. Commands collapse per axis
//! with last-writer-wins, so a burst of presses between two ticks never
//! applies more than one move per axis. Pong paddles use [`HoldState`]
//! instead, which survives drains until the key is released.

use serde::{Deserialize, Serialize};

/// A discrete player command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Rotate,
    SoftDrop,
    HardDrop,
}

/// Queue slot a command occupies; one pending command per slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Horizontal = 0,
    Vertical = 1,
    Rotate = 2,
    SoftDrop = 3,
    HardDrop = 4,
}

const SLOT_COUNT: usize = 5;

impl Command {
    fn slot(&self) -> Slot {
        match self {
            Command::MoveLeft | Command::MoveRight => Slot::Horizontal,
            Command::MoveUp | Command::MoveDown => Slot::Vertical,
            Command::Rotate => Slot::Rotate,
            Command::SoftDrop => Slot::SoftDrop,
            Command::HardDrop => Slot::HardDrop,
        }
    }

    /// The reverse direction, for directional commands
    pub fn opposite(&self) -> Option<Command> {
        match self {
            Command::MoveLeft => Some(Command::MoveRight),
            Command::MoveRight => Some(Command::MoveLeft),
            Command::MoveUp => Some(Command::MoveDown),
            Command::MoveDown => Some(Command::MoveUp),
            _ => None,
        }
    }

    pub fn is_directional(&self) -> bool {
        self.opposite().is_some()
    }
}

/// Held paddle keys (Pong)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoldState {
    pub up: bool,
    pub down: bool,
}

impl HoldState {
    /// Vertical step sign: -1 up, 1 down, 0 when neither or both are held
    pub fn axis(&self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Input consumed by a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Surviving commands in the order they were last written
    pub commands: Vec<Command>,
    /// Paddle hold state at drain time
    pub hold: HoldState,
}

impl TickInput {
    pub fn with_commands(commands: &[Command]) -> Self {
        Self {
            commands: commands.to_vec(),
            hold: HoldState::default(),
        }
    }

    pub fn held(hold: HoldState) -> Self {
        Self {
            commands: Vec::new(),
            hold,
        }
    }
}

/// Pending commands between two ticks
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    /// (write sequence, command) per slot
    slots: [Option<(u64, Command)>; SLOT_COUNT],
    seq: u64,
    /// Current heading; reversing it is dropped at push time
    heading: Option<Command>,
    hold: HoldState,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading used for reversal gating (`None` disables gating)
    pub fn set_heading(&mut self, heading: Option<Command>) {
        self.heading = heading.filter(Command::is_directional);
    }

    /// Queue a command. Returns false when it was dropped by direction gating.
    pub fn push(&mut self, command: Command) -> bool {
        if self.heading.and_then(|h| h.opposite()) == Some(command) {
            log::debug!("dropped reversal {:?} against heading {:?}", command, self.heading);
            return false;
        }
        self.seq += 1;
        self.slots[command.slot() as usize] = Some((self.seq, command));
        true
    }

    /// Mark a paddle key as held. Non-vertical commands are ignored.
    pub fn hold(&mut self, command: Command) {
        match command {
            Command::MoveUp => self.hold.up = true,
            Command::MoveDown => self.hold.down = true,
            _ => {}
        }
    }

    pub fn release(&mut self, command: Command) {
        match command {
            Command::MoveUp => self.hold.up = false,
            Command::MoveDown => self.hold.down = false,
            _ => {}
        }
    }

    pub fn hold_state(&self) -> HoldState {
        self.hold
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Take everything pending for the next tick
    pub fn drain(&mut self) -> TickInput {
        let mut pending: Vec<(u64, Command)> =
            self.slots.iter_mut().filter_map(Option::take).collect();
        pending.sort_by_key(|(seq, _)| *seq);
        TickInput {
            commands: pending.into_iter().map(|(_, c)| c).collect(),
            hold: self.hold,
        }
    }

    /// Drop pending commands and held keys (game reset)
    pub fn clear(&mut self) {
        self.slots = [None; SLOT_COUNT];
        self.hold = HoldState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_writer_wins_per_axis() {
        let mut queue = CommandQueue::new();
        queue.push(Command::MoveLeft);
        queue.push(Command::MoveUp);
        queue.push(Command::MoveRight);

        let input = queue.drain();
        assert_eq!(input.commands, vec![Command::MoveUp, Command::MoveRight]);
        assert!(queue.is_empty());
        assert!(queue.drain().commands.is_empty());
    }

    #[test]
    fn test_reversal_is_dropped() {
        let mut queue = CommandQueue::new();
        queue.set_heading(Some(Command::MoveUp));

        assert!(!queue.push(Command::MoveDown));
        assert!(queue.push(Command::MoveLeft));
        assert_eq!(queue.drain().commands, vec![Command::MoveLeft]);
    }

    #[test]
    fn test_non_directional_heading_disables_gating() {
        let mut queue = CommandQueue::new();
        queue.set_heading(Some(Command::Rotate));
        assert!(queue.push(Command::MoveDown));
    }

    #[test]
    fn test_hold_survives_drain() {
        let mut queue = CommandQueue::new();
        queue.hold(Command::MoveUp);

        assert_eq!(queue.drain().hold.axis(), -1.0);
        assert_eq!(queue.drain().hold.axis(), -1.0);

        queue.hold(Command::MoveDown);
        assert_eq!(queue.drain().hold.axis(), 0.0);

        queue.release(Command::MoveUp);
        assert_eq!(queue.drain().hold.axis(), 1.0);

        queue.clear();
        assert_eq!(queue.hold_state(), HoldState::default());
    }
}
