//! Lifetime counters and their persisted snapshot.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::storage::StatsStore;

/// Storage key shared with earlier versions of the page.
pub const STATS_STORAGE_KEY: &str = "catchingBugsStats";

/// Missing fields default on load and unknown ones are ignored, which gives
/// the "shallow merge over defaults" behavior of the old snapshot format.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionStats {
    pub games_played: u64,
    pub total_bugs_caught: u64,
    pub highest_score: u64,
    pub longest_streak: u64,
    pub rare_bugs_caught: u64,
    pub ultra_rare_bugs_caught: u64,
    /// Seconds.
    #[serde(alias = "totalPlayTimeSeconds")]
    pub total_play_time: u64,
}

impl SessionStats {
    /// Only a JSON object is a snapshot. Arrays would otherwise be mapped
    /// onto the fields positionally.
    pub fn from_json(json: &str) -> Result<Self> {
        let malformed = |e: serde_json::Error| GameError::Storage(format!("malformed stats snapshot: {e}"));
        match serde_json::from_str::<serde_json::Value>(json).map_err(malformed)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value).map_err(malformed),
            other => Err(GameError::Storage(format!("stats snapshot is not an object: {other}"))),
        }
    }

    pub fn to_json(&self) -> String {
        // Plain integer fields: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Load the snapshot, falling back to defaults when it is missing, unreadable
/// or malformed.
pub fn load_stats(store: &dyn StatsStore) -> SessionStats {
    let raw = match store.read(STATS_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SessionStats::default(),
        Err(err) => {
            tracing::warn!("could not read stats: {err}");
            return SessionStats::default();
        }
    };
    match SessionStats::from_json(&raw) {
        Ok(stats) => stats,
        Err(err) => {
            tracing::warn!("discarding malformed stats snapshot: {err}");
            SessionStats::default()
        }
    }
}

pub fn save_stats(store: &mut dyn StatsStore, stats: &SessionStats) -> Result<()> {
    let json = serde_json::to_string(stats).map_err(|e| GameError::Storage(e.to_string()))?;
    store.write(STATS_STORAGE_KEY, &json)
}
