//! Persisted daemon state, backed by `sled`. Keyed exactly as named in the
//! external-interface contract: `main:draw_state`, `qp:draw_state`,
//! `bot:stats`, `bot:paused`, `main:last_draw_ts`, `qp:last_draw_ts`. Every
//! value is a `bincode`-serialized struct so the daemon can resume mid-draw
//! after a restart instead of re-deriving everything from chain state alone.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IndexerError;
use crate::scan::GameId;

const KEY_MAIN_DRAW_STATE: &[u8] = b"main:draw_state";
const KEY_QP_DRAW_STATE: &[u8] = b"qp:draw_state";
const KEY_BOT_STATS: &[u8] = b"bot:stats";
const KEY_BOT_PAUSED: &[u8] = b"bot:paused";
const KEY_MAIN_LAST_DRAW_TS: &[u8] = b"main:last_draw_ts";
const KEY_QP_LAST_DRAW_TS: &[u8] = b"qp:last_draw_ts";

/// What the daemon believes about one game's in-flight draw, checkpointed
/// after every phase transition so a restart resumes instead of re-scanning
/// a draw it already finalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawState {
    pub draw_id: u64,
    /// Mirrors the on-chain `Phase` as last observed by the daemon.
    pub last_seen_phase: u8,
    pub retry_count: u8,
    pub last_nonce: Option<u64>,
    pub last_verification_hash_hex: Option<String>,
}

/// Running counters surfaced to operators via the webhook and logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotStats {
    pub draws_finalized: u64,
    pub draws_aborted: u64,
    pub verification_mismatches: u64,
    pub malformed_tickets_skipped: u64,
}

pub struct Store {
    db: sled::Db,
}

impl Store {
    pub fn open(dir: &Path) -> Result<Self, IndexerError> {
        let db = sled::open(dir)?;
        Ok(Self { db })
    }

    fn draw_state_key(game: GameId) -> &'static [u8] {
        match game {
            GameId::Main => KEY_MAIN_DRAW_STATE,
            GameId::QuickPick => KEY_QP_DRAW_STATE,
        }
    }

    fn last_draw_ts_key(game: GameId) -> &'static [u8] {
        match game {
            GameId::Main => KEY_MAIN_LAST_DRAW_TS,
            GameId::QuickPick => KEY_QP_LAST_DRAW_TS,
        }
    }

    fn get<T: for<'de> Deserialize<'de>>(&self, key: &[u8]) -> Result<Option<T>, IndexerError> {
        match self.db.get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(&self, key: &[u8], value: &T) -> Result<(), IndexerError> {
        let bytes = bincode::serialize(value)?;
        self.db.insert(key, bytes)?;
        self.db.flush()?;
        Ok(())
    }

    pub fn draw_state(&self, game: GameId) -> Result<DrawState, IndexerError> {
        Ok(self.get(Self::draw_state_key(game))?.unwrap_or_default())
    }

    pub fn put_draw_state(&self, game: GameId, state: &DrawState) -> Result<(), IndexerError> {
        self.put(Self::draw_state_key(game), state)
    }

    pub fn last_draw_ts(&self, game: GameId) -> Result<i64, IndexerError> {
        Ok(self.get(Self::last_draw_ts_key(game))?.unwrap_or(0))
    }

    pub fn put_last_draw_ts(&self, game: GameId, ts: i64) -> Result<(), IndexerError> {
        self.put(Self::last_draw_ts_key(game), &ts)
    }

    pub fn stats(&self) -> Result<BotStats, IndexerError> {
        Ok(self.get(KEY_BOT_STATS)?.unwrap_or_default())
    }

    pub fn put_stats(&self, stats: &BotStats) -> Result<(), IndexerError> {
        self.put(KEY_BOT_STATS, stats)
    }

    pub fn is_paused(&self) -> Result<bool, IndexerError> {
        Ok(self.get(KEY_BOT_PAUSED)?.unwrap_or(false))
    }

    pub fn set_paused(&self, paused: bool) -> Result<(), IndexerError> {
        self.put(KEY_BOT_PAUSED, &paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_state_round_trips_through_sled() {
        let dir = tempdir("round-trip");
        let store = Store::open(&dir).unwrap();
        let state = DrawState { draw_id: 42, last_seen_phase: 2, retry_count: 1, last_nonce: Some(7), last_verification_hash_hex: Some("ab".into()) };
        store.put_draw_state(GameId::Main, &state).unwrap();
        let loaded = store.draw_state(GameId::Main).unwrap();
        assert_eq!(loaded.draw_id, 42);
        assert_eq!(loaded.retry_count, 1);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn games_use_distinct_keys() {
        let dir = tempdir("distinct-keys");
        let store = Store::open(&dir).unwrap();
        store.put_draw_state(GameId::Main, &DrawState { draw_id: 1, ..Default::default() }).unwrap();
        store.put_draw_state(GameId::QuickPick, &DrawState { draw_id: 2, ..Default::default() }).unwrap();
        assert_eq!(store.draw_state(GameId::Main).unwrap().draw_id, 1);
        assert_eq!(store.draw_state(GameId::QuickPick).unwrap().draw_id, 2);
        std::fs::remove_dir_all(&dir).ok();
    }

    fn tempdir(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("lotto-indexer-test-{}-{}", std::process::id(), name));
        p
    }
}
