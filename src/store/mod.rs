//! The shared hand-off store between the feed watcher and the popup host.
//!
//! A tiny key-value surface (`get`/`set` plus a change notification) with
//! last-write-wins semantics and no cross-field transactionality — one human
//! drives both sides serially, so writers never need to coordinate.

pub mod file;

pub use file::JsonFileStore;

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum StateKey {
    #[strum(serialize = "active_post_text")]
    ActivePostText,
    #[strum(serialize = "user_tone")]
    UserTone,
    #[strum(serialize = "requested_at")]
    RequestedAt,
}

impl StateKey {
    pub const ALL: [StateKey; 3] = [Self::ActivePostText, Self::UserTone, Self::RequestedAt];
}

/// Everything the two processes hand off to each other. The watcher writes
/// `active_post_text`/`requested_at`; the popup host reads them and writes
/// `user_tone`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedState {
    #[serde(default)]
    pub active_post_text: Option<String>,
    #[serde(default)]
    pub user_tone: Option<String>,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
}

impl SharedState {
    fn value_of(&self, key: StateKey) -> Value {
        let result = match key {
            StateKey::ActivePostText => serde_json::to_value(&self.active_post_text),
            StateKey::UserTone => serde_json::to_value(&self.user_tone),
            StateKey::RequestedAt => serde_json::to_value(self.requested_at),
        };
        result.unwrap_or(Value::Null)
    }

    fn apply(&mut self, key: StateKey, value: Value) -> Result<(), StoreError> {
        let corrupt = |e: serde_json::Error| StoreError::Corrupt(format!("{key}: {e}"));
        match key {
            StateKey::ActivePostText => {
                self.active_post_text = serde_json::from_value(value).map_err(corrupt)?;
            }
            StateKey::UserTone => {
                self.user_tone = serde_json::from_value(value).map_err(corrupt)?;
            }
            StateKey::RequestedAt => {
                self.requested_at = serde_json::from_value(value).map_err(corrupt)?;
            }
        }
        Ok(())
    }
}

pub trait StateStore: Send + Sync {
    /// Current state in full.
    fn snapshot(&self) -> Result<SharedState, StoreError>;

    /// Merge the given entries in, last write wins per key, and notify
    /// subscribers once.
    fn set(&self, entries: Vec<(StateKey, Value)>) -> Result<(), StoreError>;

    /// Change notification: receivers observe the state after each `set`.
    fn subscribe(&self) -> watch::Receiver<SharedState>;

    /// Mapping lookup over the requested keys; unset fields map to `Null`.
    fn get(&self, keys: &[StateKey]) -> Result<HashMap<StateKey, Value>, StoreError> {
        let state = self.snapshot()?;
        Ok(keys.iter().map(|key| (*key, state.value_of(*key))).collect())
    }

    // ── Typed conveniences over get/set ─────────────────────────────────

    fn record_extraction(&self, text: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let at = serde_json::to_value(at).map_err(|e| StoreError::Persist(e.to_string()))?;
        self.set(vec![
            (StateKey::ActivePostText, Value::String(text.to_owned())),
            (StateKey::RequestedAt, at),
        ])
    }

    fn set_tone(&self, tone: &str) -> Result<(), StoreError> {
        self.set(vec![(StateKey::UserTone, Value::String(tone.to_owned()))])
    }
}

/// Non-persistent store, for embedding and tests.
pub struct MemoryStore {
    inner: std::sync::Mutex<SharedState>,
    tx: watch::Sender<SharedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SharedState::default());
        Self {
            inner: std::sync::Mutex::new(SharedState::default()),
            tx,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStore {
    fn snapshot(&self) -> Result<SharedState, StoreError> {
        Ok(self.inner.lock().expect("state lock poisoned").clone())
    }

    fn set(&self, entries: Vec<(StateKey, Value)>) -> Result<(), StoreError> {
        let mut state = self.inner.lock().expect("state lock poisoned");
        for (key, value) in entries {
            state.apply(key, value)?;
        }
        self.tx.send_replace(state.clone());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<SharedState> {
        self.tx.subscribe()
    }
}
