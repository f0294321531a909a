//! Save-slot persistence
//!
//! Features:
//! - Ten numbered slots per owner and game
//! - Records carry a versioned snapshot envelope plus score and name
//! - In-memory store, mirrored to LocalStorage on web

pub mod slots;

pub use slots::{MAX_SLOTS, MemorySaveStore, SaveRecord, SaveSlot, SaveStore, SlotInfo};
