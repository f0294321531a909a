//! Save slots and the store boundary

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::platform::storage;
use crate::session::PlayerId;
use crate::sim::{GameKind, Snapshot};

/// Number of slots per owner and game
pub const MAX_SLOTS: u8 = 10;

/// A slot number, always in 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SaveSlot(u8);

impl SaveSlot {
    pub fn new(slot: u8) -> Result<Self, PersistenceError> {
        if (1..=MAX_SLOTS).contains(&slot) {
            Ok(Self(slot))
        } else {
            Err(PersistenceError::InvalidSlot(slot))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Every valid slot, in order
    pub fn all() -> impl Iterator<Item = SaveSlot> {
        (1..=MAX_SLOTS).map(SaveSlot)
    }

    /// Name used when the player does not give one
    pub fn default_name(&self) -> String {
        format!("Save Slot {}", self.0)
    }
}

impl TryFrom<u8> for SaveSlot {
    type Error = PersistenceError;

    fn try_from(slot: u8) -> Result<Self, Self::Error> {
        Self::new(slot)
    }
}

impl From<SaveSlot> for u8 {
    fn from(slot: SaveSlot) -> u8 {
        slot.0
    }
}

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One saved game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub game: GameKind,
    pub slot: SaveSlot,
    pub name: String,
    pub score: u64,
    pub snapshot: Snapshot,
}

/// Slot listing entry (without the snapshot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    pub slot: SaveSlot,
    pub name: String,
    pub score: u64,
}

/// Storage for save slots. Saving into an occupied slot overwrites it.
pub trait SaveStore {
    fn save(&mut self, owner: &PlayerId, record: SaveRecord) -> Result<(), PersistenceError>;

    fn load(
        &self,
        owner: &PlayerId,
        game: GameKind,
        slot: SaveSlot,
    ) -> Result<SaveRecord, PersistenceError>;

    /// Occupied slots for a game, ordered by slot number
    fn list(&self, owner: &PlayerId, game: GameKind) -> Result<Vec<SlotInfo>, PersistenceError>;

    /// Remove a save. Returns whether the slot was occupied.
    fn delete(
        &mut self,
        owner: &PlayerId,
        game: GameKind,
        slot: SaveSlot,
    ) -> Result<bool, PersistenceError>;
}

type SlotKey = (String, GameKind, SaveSlot);

/// In-process store, optionally mirrored to LocalStorage
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    records: BTreeMap<SlotKey, SaveRecord>,
    mirror: bool,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by LocalStorage, preloaded with the owner's saves.
    /// Without browser storage this is a plain in-memory store.
    pub fn persistent(owner: &PlayerId) -> Self {
        if !cfg!(target_arch = "wasm32") {
            log::info!("No browser storage, saves stay in memory");
            return Self::new();
        }

        let mut store = Self {
            records: BTreeMap::new(),
            mirror: true,
        };
        for game in GameKind::ALL {
            for slot in SaveSlot::all() {
                let Some(json) = storage::get_item(&Self::storage_key(owner, game, slot)) else {
                    continue;
                };
                match serde_json::from_str::<SaveRecord>(&json) {
                    Ok(record) if record.game == game && record.slot == slot => {
                        store.records.insert((owner.to_string(), game, slot), record);
                    }
                    Ok(_) => log::warn!("Ignoring mismatched save in {} slot {}", game, slot),
                    Err(e) => log::warn!("Ignoring unreadable save in {} slot {}: {}", game, slot, e),
                }
            }
        }
        log::info!("Loaded {} saves for {}", store.records.len(), owner);
        store
    }

    /// LocalStorage key
    fn storage_key(owner: &PlayerId, game: GameKind, slot: SaveSlot) -> String {
        format!("retro_arcade_save:{}:{}:{}", owner, game.id(), slot)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SaveStore for MemorySaveStore {
    fn save(&mut self, owner: &PlayerId, record: SaveRecord) -> Result<(), PersistenceError> {
        if record.snapshot.game() != record.game {
            return Err(PersistenceError::Storage(format!(
                "snapshot for {} cannot be saved as {}",
                record.snapshot.game(),
                record.game
            )));
        }
        if self.mirror {
            let json = serde_json::to_string(&record)?;
            let key = Self::storage_key(owner, record.game, record.slot);
            if !storage::set_item(&key, &json) {
                return Err(PersistenceError::Storage(format!(
                    "LocalStorage rejected {}",
                    key
                )));
            }
        }
        log::info!(
            "Saved {} slot {} ({:?}) for {}",
            record.game,
            record.slot,
            record.name,
            owner
        );
        self.records
            .insert((owner.to_string(), record.game, record.slot), record);
        Ok(())
    }

    fn load(
        &self,
        owner: &PlayerId,
        game: GameKind,
        slot: SaveSlot,
    ) -> Result<SaveRecord, PersistenceError> {
        self.records
            .get(&(owner.to_string(), game, slot))
            .cloned()
            .ok_or(PersistenceError::NotFound {
                game,
                slot: slot.get(),
            })
    }

    fn list(&self, owner: &PlayerId, game: GameKind) -> Result<Vec<SlotInfo>, PersistenceError> {
        Ok(self
            .records
            .iter()
            .filter(|((o, g, _), _)| o.as_str() == owner.as_str() && *g == game)
            .map(|(_, r)| SlotInfo {
                slot: r.slot,
                name: r.name.clone(),
                score: r.score,
            })
            .collect())
    }

    fn delete(
        &mut self,
        owner: &PlayerId,
        game: GameKind,
        slot: SaveSlot,
    ) -> Result<bool, PersistenceError> {
        if self.mirror {
            storage::remove_item(&Self::storage_key(owner, game, slot));
        }
        Ok(self
            .records
            .remove(&(owner.to_string(), game, slot))
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Engine, snapshot};

    fn record(game: GameKind, slot: u8, score: u64) -> SaveRecord {
        let slot = SaveSlot::new(slot).unwrap();
        SaveRecord {
            game,
            slot,
            name: slot.default_name(),
            score,
            snapshot: snapshot(&Engine::new(game, 1)),
        }
    }

    #[test]
    fn test_slot_range() {
        assert!(SaveSlot::new(0).is_err());
        assert!(SaveSlot::new(1).is_ok());
        assert!(SaveSlot::new(10).is_ok());
        assert!(matches!(
            SaveSlot::new(11),
            Err(PersistenceError::InvalidSlot(11))
        ));
        assert_eq!(SaveSlot::all().count(), 10);
        assert_eq!(SaveSlot::new(3).unwrap().default_name(), "Save Slot 3");
    }

    #[test]
    fn test_slot_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<SaveSlot>("4").is_ok());
        assert!(serde_json::from_str::<SaveSlot>("12").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let owner = PlayerId::anonymous();
        let mut store = MemorySaveStore::new();
        store.save(&owner, record(GameKind::Snake, 2, 30)).unwrap();

        let slot = SaveSlot::new(2).unwrap();
        let loaded = store.load(&owner, GameKind::Snake, slot).unwrap();
        assert_eq!(loaded.score, 30);
        assert_eq!(loaded.snapshot.game(), GameKind::Snake);

        assert!(matches!(
            store.load(&owner, GameKind::Pong, slot),
            Err(PersistenceError::NotFound { slot: 2, .. })
        ));
        assert!(matches!(
            store.load(&PlayerId::new("someone-else"), GameKind::Snake, slot),
            Err(PersistenceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_save_overwrites_slot() {
        let owner = PlayerId::anonymous();
        let mut store = MemorySaveStore::new();
        store.save(&owner, record(GameKind::Tetris, 1, 10)).unwrap();
        store.save(&owner, record(GameKind::Tetris, 1, 99)).unwrap();
        assert_eq!(store.len(), 1);
        let slot = SaveSlot::new(1).unwrap();
        assert_eq!(store.load(&owner, GameKind::Tetris, slot).unwrap().score, 99);
    }

    #[test]
    fn test_list_is_ordered_by_slot() {
        let owner = PlayerId::anonymous();
        let mut store = MemorySaveStore::new();
        for slot in [7, 2, 10] {
            store.save(&owner, record(GameKind::Pong, slot, 0)).unwrap();
        }
        store.save(&owner, record(GameKind::Snake, 1, 0)).unwrap();

        let slots: Vec<u8> = store
            .list(&owner, GameKind::Pong)
            .unwrap()
            .iter()
            .map(|i| i.slot.get())
            .collect();
        assert_eq!(slots, vec![2, 7, 10]);
    }

    #[test]
    fn test_delete() {
        let owner = PlayerId::anonymous();
        let mut store = MemorySaveStore::new();
        store.save(&owner, record(GameKind::Snake, 5, 0)).unwrap();
        let slot = SaveSlot::new(5).unwrap();
        assert!(store.delete(&owner, GameKind::Snake, slot).unwrap());
        assert!(!store.delete(&owner, GameKind::Snake, slot).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_mismatched_snapshot_is_rejected() {
        let owner = PlayerId::anonymous();
        let mut store = MemorySaveStore::new();
        let mut bad = record(GameKind::Snake, 1, 0);
        bad.game = GameKind::Pong;
        assert!(matches!(
            store.save(&owner, bad),
            Err(PersistenceError::Storage(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_persistent_store_without_browser_is_memory_only() {
        let owner = PlayerId::anonymous();
        let mut store = MemorySaveStore::persistent(&owner);
        assert!(store.is_empty());
        store.save(&owner, record(GameKind::Snake, 1, 0)).unwrap();
        assert_eq!(store.len(), 1);
    }
}
