//! Error types for the arcade core.
//!
//! Gameplay never fails: a blocked move or rotation is a silent no-op.
//! The errors here cover the boundaries only, restoring snapshots and
//! talking to the save-slot and leaderboard collaborators.

use crate::sim::GameKind;

/// Reasons a snapshot cannot be restored into an engine.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The JSON text could not be decoded into a snapshot envelope.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The envelope was written by an incompatible format version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the envelope.
        found: u32,
        /// Version this build writes.
        expected: u32,
    },

    /// The snapshot belongs to a different game than the session.
    #[error("snapshot is for {found}, session is running {expected}")]
    WrongGame {
        /// Game the session was created for.
        expected: GameKind,
        /// Game recorded in the snapshot.
        found: GameKind,
    },

    /// A field is present but violates an engine invariant.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl SnapshotError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures reported by a save-slot store.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Slot numbers run from 1 to 10.
    #[error("slot {0} is out of range (1..=10)")]
    InvalidSlot(u8),

    /// Nothing saved in the requested slot.
    #[error("no save in slot {slot} for {game}")]
    NotFound {
        /// Game the lookup was for.
        game: GameKind,
        /// Requested slot number.
        slot: u8,
    },

    /// The record could not be encoded or decoded.
    #[error("save record encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The underlying storage rejected the operation.
    #[error("storage unavailable: {0}")]
    Storage(String),

    /// A loaded record holds a snapshot that cannot be restored.
    #[error("saved game cannot be restored: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Failures reported by a leaderboard.
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    /// The leaderboard could not be read or written.
    #[error("leaderboard storage unavailable: {0}")]
    Storage(String),

    /// The leaderboard payload could not be encoded or decoded.
    #[error("leaderboard encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Invalid or unreadable settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings JSON could not be decoded.
    #[error("malformed settings: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A setting holds a value the scheduler cannot use.
    #[error("invalid setting {name}: {reason}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// Explanation of what is wrong with it.
        reason: String,
    },
}
