//! High score leaderboard system
//!
//! One table per game, each holding the best score of every owner, ranked
//! descending. Persisted to LocalStorage on web.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;
use crate::platform::storage;
use crate::session::PlayerId;
use crate::sim::GameKind;

/// Maximum number of high scores to keep per game
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Owner the score belongs to
    pub name: String,
    /// Player's score
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Result of a score submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    /// The owner's best score for the game went up
    pub improved: bool,
    /// Rank on the table after the submission (1-indexed)
    pub rank: Option<usize>,
}

/// Leaderboard collaborator
pub trait Leaderboard {
    /// Record a finished game's score, keeping the owner's best
    fn submit_score(
        &mut self,
        game: GameKind,
        owner: &PlayerId,
        score: u64,
    ) -> Result<Submission, LeaderboardError>;

    /// Best scores for a game, highest first
    fn fetch_top(&self, game: GameKind, limit: usize) -> Result<Vec<HighScoreEntry>, LeaderboardError>;
}

/// High score table for one game
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Best score recorded for `name`
    pub fn best_for(&self, name: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }

    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    /// Add a score for `name`, replacing their previous best when it is
    /// higher. Returns the rank achieved (1-indexed) or None if the score
    /// was not an improvement or did not qualify.
    pub fn add_score(&mut self, name: &str, score: u64, timestamp: f64) -> Option<usize> {
        if self.best_for(name).is_some_and(|best| best >= score) {
            return None;
        }
        if !self.qualifies(score) {
            return None;
        }
        self.entries.retain(|e| e.name != name);

        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Tables for every game, kept in memory and mirrored to LocalStorage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalLeaderboard {
    tables: BTreeMap<GameKind, HighScores>,
    #[serde(skip)]
    mirror: bool,
}

impl LocalLeaderboard {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "retro_arcade_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, game: GameKind) -> Option<&HighScores> {
        self.tables.get(&game)
    }

    /// Load high scores from LocalStorage (empty without browser storage)
    pub fn load() -> Self {
        let Some(json) = storage::get_item(Self::STORAGE_KEY) else {
            log::info!("No high scores found, starting fresh");
            return Self {
                mirror: cfg!(target_arch = "wasm32"),
                ..Self::default()
            };
        };
        match serde_json::from_str::<LocalLeaderboard>(&json) {
            Ok(mut board) => {
                let total: usize = board.tables.values().map(|t| t.entries.len()).sum();
                log::info!("Loaded {} high scores", total);
                board.mirror = true;
                board
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self {
                    mirror: true,
                    ..Self::default()
                }
            }
        }
    }

    fn save(&self) -> Result<(), LeaderboardError> {
        if !self.mirror {
            return Ok(());
        }
        let json = serde_json::to_string(self)?;
        if !storage::set_item(Self::STORAGE_KEY, &json) {
            return Err(LeaderboardError::Storage(
                "LocalStorage rejected the high score table".to_string(),
            ));
        }
        Ok(())
    }
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

impl Leaderboard for LocalLeaderboard {
    fn submit_score(
        &mut self,
        game: GameKind,
        owner: &PlayerId,
        score: u64,
    ) -> Result<Submission, LeaderboardError> {
        let table = self.tables.entry(game).or_default();
        let previous = table.clone();
        let rank = table.add_score(owner.as_str(), score, now_ms());
        if rank.is_none() {
            return Ok(Submission {
                improved: false,
                rank: table.rank_of(owner.as_str()),
            });
        }

        if let Err(e) = self.save() {
            // Keep memory and storage in step
            self.tables.insert(game, previous);
            return Err(e);
        }
        log::info!("{} scored {} in {} (rank {:?})", owner, score, game, rank);
        Ok(Submission {
            improved: true,
            rank,
        })
    }

    fn fetch_top(&self, game: GameKind, limit: usize) -> Result<Vec<HighScoreEntry>, LeaderboardError> {
        Ok(self
            .tables
            .get(&game)
            .map(|t| t.entries.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
