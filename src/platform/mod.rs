//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (browser `KeyboardEvent.key` names to commands)
//! - Storage (LocalStorage on web, nothing natively)

pub mod keys;
pub mod storage;

pub use keys::{KeyEvent, map_key};
