//! Persistence strategies for [`UserState`].
//!
//! The file layout is `{"version": N, "state": {...}}`. Version 0 is the
//! legacy unversioned record (either a bare state object or an envelope with
//! `version: 0`) and is migrated on load.

use anyhow::{anyhow, Result};
use cinelog_models::{clamp_progress, UserState};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

pub trait StateStorage: Send + Sync {
    /// Load the persisted state. `Ok(None)` means nothing usable is stored.
    fn load(&self) -> Result<Option<UserState>>;
    fn save(&self, state: &UserState) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Serialize)]
struct StoredState<'a> {
    version: u32,
    state: &'a UserState,
}

/// Decode a persisted record of any supported version into current-schema state
pub fn decode_state(content: &str) -> Result<UserState> {
    let value: Value = serde_json::from_str(content)?;
    let (version, state_value) = match value {
        Value::Object(mut map) if map.contains_key("state") => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32;
            let state = map.remove("state").unwrap_or(Value::Null);
            (version, state)
        }
        other => (0, other),
    };

    if version > CURRENT_SCHEMA_VERSION {
        return Err(anyhow!(
            "stored state has schema version {} but only {} is supported",
            version,
            CURRENT_SCHEMA_VERSION
        ));
    }

    let state: UserState = serde_json::from_value(state_value)?;
    if version < CURRENT_SCHEMA_VERSION {
        debug!(from = version, to = CURRENT_SCHEMA_VERSION, "Migrating stored user state");
    }
    Ok(normalize(state))
}

pub fn encode_state(state: &UserState) -> Result<String> {
    Ok(serde_json::to_string_pretty(&StoredState {
        version: CURRENT_SCHEMA_VERSION,
        state,
    })?)
}

/// Stored records are not trusted: rebuild composite ids, clamp progress and
/// drop duplicate keys (first occurrence wins).
fn normalize(mut state: UserState) -> UserState {
    let mut seen = HashSet::new();
    state.watchlist.retain(|item| seen.insert(item.key()));
    for item in &mut state.watchlist {
        item.id = item.key().composite_id();
    }

    let mut seen = HashSet::new();
    state.watch_history.retain(|item| seen.insert(item.key()));
    for item in &mut state.watch_history {
        item.id = item.key().composite_id();
        item.progress = clamp_progress(item.progress);
    }
    state
}

/// JSON file storage under a fixed namespace, e.g. `data/user-storage.json`
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.bak")
    }

    /// Keep the unreadable file around instead of silently overwriting it
    fn backup_unreadable(&self, error: &anyhow::Error) {
        let backup_path = self.backup_path();
        if let Err(backup_err) = std::fs::copy(&self.path, &backup_path) {
            warn!(
                "Failed to backup unreadable user state: {}. Starting with empty state.",
                backup_err
            );
        } else {
            warn!(
                "User state unreadable (error: {}). Backed up to {:?} and starting with empty state.",
                error, backup_path
            );
        }
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<UserState>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No stored user state, starting empty");
            return Ok(None);
        }

        let decoded = std::fs::read(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| String::from_utf8(bytes).map_err(anyhow::Error::from))
            .and_then(|content| decode_state(&content));
        match decoded {
            Ok(state) => {
                info!(
                    watchlist = state.watchlist.len(),
                    history = state.watch_history.len(),
                    "Loaded user state from {:?}",
                    self.path
                );
                Ok(Some(state))
            }
            Err(e) => {
                self.backup_unreadable(&e);
                Ok(None)
            }
        }
    }

    fn save(&self, state: &UserState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let encoded = encode_state(state)?;

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, encoded)?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!(
            watchlist = state.watchlist.len(),
            history = state.watch_history.len(),
            "Saved user state"
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Removed stored user state {:?}", self.path);
        }
        Ok(())
    }
}

/// In-process storage for tests and sessions that should not touch disk
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<Option<UserState>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: UserState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<UserState> {
        self.state.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<UserState>> {
        let guard = self.state.lock().map_err(|_| anyhow!("memory storage lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, state: &UserState) -> Result<()> {
        let mut guard = self.state.lock().map_err(|_| anyhow!("memory storage lock poisoned"))?;
        *guard = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self.state.lock().map_err(|_| anyhow!("memory storage lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}
