use super::{SharedState, StateKey, StateStore};
use crate::error::StoreError;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::watch;

/// JSON-file-backed store. Writes go through a temp file and an atomic
/// rename so a crash mid-write never leaves a torn state file behind.
pub struct JsonFileStore {
    path: PathBuf,
    inner: Mutex<SharedState>,
    tx: watch::Sender<SharedState>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SharedState::default(),
            Err(e) => return Err(e.into()),
        };

        let (tx, _) = watch::channel(state.clone());
        Ok(Self {
            path,
            inner: Mutex::new(state),
            tx,
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn persist(&self, state: &SharedState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_vec_pretty(state)
            .map_err(|e| StoreError::Persist(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn snapshot(&self) -> Result<SharedState, StoreError> {
        Ok(self.inner.lock().expect("state lock poisoned").clone())
    }

    fn set(&self, entries: Vec<(StateKey, Value)>) -> Result<(), StoreError> {
        let mut state = self.inner.lock().expect("state lock poisoned");
        for (key, value) in entries {
            state.apply(key, value)?;
        }
        self.persist(&state)?;
        self.tx.send_replace(state.clone());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<SharedState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::open(&path).unwrap();
        let at = Utc::now();
        store.record_extraction("handed-off text", at).unwrap();
        store.set_tone("warm").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        let state = reopened.snapshot().unwrap();
        assert_eq!(state.active_post_text.as_deref(), Some("handed-off text"));
        assert_eq!(state.user_tone.as_deref(), Some("warm"));
        assert_eq!(state.requested_at, Some(at));
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(store.snapshot().unwrap(), SharedState::default());
    }

    #[test]
    fn corrupt_file_is_reported_not_clobbered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json at all").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
        // the unreadable file is left in place for inspection
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json at all");
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set_tone("bold").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("state.json")]);
    }
}
