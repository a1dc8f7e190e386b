//! Persisted per-install user state.
//!
//! These records are mutated in-process by the polling controllers and
//! flushed to disk through [`crate::persistence::UserDataStore`] on
//! every real change. All mutators report whether anything actually
//! changed so callers can skip redundant saves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use uuid::Uuid;

/// A recorded personal-best run time for a dungeon path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestTime {
    /// Run duration.
    pub duration: Duration,
    /// When the run was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Dungeon-tracker user state: hidden dungeons, daily completions,
/// and personal-best times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonUserData {
    /// Dungeons the user chose not to display.
    pub hidden_dungeons: HashSet<Uuid>,
    /// Paths completed since the last daily reset.
    pub completed_paths: HashSet<Uuid>,
    /// Best recorded time per path.
    pub best_times: HashMap<Uuid, BestTime>,
    /// When the completion set was last cleared (UTC).
    pub last_reset: DateTime<Utc>,
}

impl Default for DungeonUserData {
    fn default() -> Self {
        Self {
            hidden_dungeons: HashSet::new(),
            completed_paths: HashSet::new(),
            best_times: HashMap::new(),
            last_reset: Utc::now(),
        }
    }
}

impl DungeonUserData {
    /// Mark a path completed. Returns `true` if it was not already.
    pub fn mark_completed(&mut self, path_id: Uuid) -> bool {
        self.completed_paths.insert(path_id)
    }

    /// Whether a path is completed since the last reset.
    #[must_use]
    pub fn is_completed(&self, path_id: Uuid) -> bool {
        self.completed_paths.contains(&path_id)
    }

    /// Record `elapsed` as the best time for `path_id` if it beats the
    /// stored one (or none is stored). Zero-length runs are ignored.
    ///
    /// Returns `true` when the record was updated.
    pub fn record_best_time(
        &mut self,
        path_id: Uuid,
        elapsed: Duration,
        now: DateTime<Utc>,
    ) -> bool {
        if elapsed.is_zero() {
            return false;
        }
        let improves = self
            .best_times
            .get(&path_id)
            .is_none_or(|best| elapsed < best.duration);
        if improves {
            self.best_times.insert(
                path_id,
                BestTime {
                    duration: elapsed,
                    recorded_at: now,
                },
            );
        }
        improves
    }

    /// Clear completions if `now` falls on a different UTC calendar
    /// date than the last reset. Returns `true` when a reset happened.
    ///
    /// Idempotent within a date: a second call on the same day is a
    /// no-op even if completions were added in between.
    pub fn apply_daily_reset(&mut self, now: DateTime<Utc>) -> bool {
        if now.date_naive() == self.last_reset.date_naive() {
            return false;
        }
        self.completed_paths.clear();
        self.last_reset = now;
        true
    }
}

/// Zone-tracker user state: unlocked items per character, plus items
/// the user chose to hide everywhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneUserData {
    /// Unlocked item ids, keyed by character name.
    pub unlocked: HashMap<String, HashSet<u32>>,
    /// Item ids hidden from every character's display.
    pub hidden_items: HashSet<u32>,
}

impl ZoneUserData {
    /// Whether `item_id` is unlocked for `character`.
    #[must_use]
    pub fn is_unlocked(&self, character: &str, item_id: u32) -> bool {
        self.unlocked
            .get(character)
            .is_some_and(|set| set.contains(&item_id))
    }

    /// Unlock `item_id` for `character`. Returns `true` if newly
    /// unlocked.
    pub fn unlock(&mut self, character: &str, item_id: u32) -> bool {
        self.unlocked
            .entry(character.to_string())
            .or_default()
            .insert(item_id)
    }

    /// Hide an item globally. Returns `true` if newly hidden.
    pub fn hide(&mut self, item_id: u32) -> bool {
        self.hidden_items.insert(item_id)
    }
}
