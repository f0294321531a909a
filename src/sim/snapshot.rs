//! Versioned engine snapshots
//!
//! A snapshot is the full engine state, random stream included, wrapped in
//! an envelope carrying a format version. Restoring checks the version and
//! the engine invariants before handing the state back, so a bad save never
//! reaches a running session.

use serde::{Deserialize, Serialize};

use super::engine::{Engine, Simulation};
use super::state::GameKind;
use crate::error::SnapshotError;

/// Current snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub engine: Engine,
}

impl Snapshot {
    pub fn game(&self) -> GameKind {
        self.engine.kind()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Capture the engine as it is now
pub fn snapshot(engine: &Engine) -> Snapshot {
    Snapshot {
        version: SNAPSHOT_VERSION,
        engine: engine.clone(),
    }
}

/// Turn a snapshot back into an engine, rejecting anything that could not
/// have been produced by ticking
pub fn restore(snapshot: Snapshot) -> Result<Engine, SnapshotError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    snapshot.engine.validate()?;
    Ok(snapshot.engine)
}
