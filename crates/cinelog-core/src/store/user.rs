use chrono::Utc;
use cinelog_models::{MediaKey, MediaType, UserState, WatchHistoryItem, WatchlistItem};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};
use crate::storage::StateStorage;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Durable record of the user's auth flag, watchlist and watch history.
///
/// State lives in a `watch` channel: every mutation is a single
/// `send_if_modified` call, so mutations never interleave, and views can
/// `subscribe()` to re-render on change. Each effective mutation is written
/// to the injected [`StateStorage`] under `save_lock`, so saves land in
/// mutation order; a failed write is logged and the in-memory state stays
/// authoritative for the session.
pub struct UserStore {
    state: watch::Sender<UserState>,
    storage: Arc<dyn StateStorage>,
    save_lock: Mutex<()>,
    history_limit: usize,
}

impl UserStore {
    /// Empty store that persists into `storage`
    pub fn new(storage: Arc<dyn StateStorage>, history_limit: usize) -> Self {
        Self::with_state(UserState::default(), storage, history_limit)
    }

    /// Restore from `storage`, falling back to an empty state if it cannot be read
    pub fn load(storage: Arc<dyn StateStorage>, history_limit: usize) -> Self {
        let state = match storage.load() {
            Ok(Some(state)) => state,
            Ok(None) => UserState::default(),
            Err(e) => {
                warn!(operation = "user_store_load", error = %e, "Failed to load user state, starting empty");
                UserState::default()
            }
        };
        Self::with_state(state, storage, history_limit)
    }

    fn with_state(mut state: UserState, storage: Arc<dyn StateStorage>, history_limit: usize) -> Self {
        let history_limit = history_limit.max(1);
        state.watch_history.truncate(history_limit);
        let (state, _) = watch::channel(state);
        Self {
            state,
            storage,
            save_lock: Mutex::new(()),
            history_limit,
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn subscribe(&self) -> watch::Receiver<UserState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> UserState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn watchlist(&self) -> Vec<WatchlistItem> {
        self.state.borrow().watchlist.clone()
    }

    /// Most recent first
    pub fn watch_history(&self) -> Vec<WatchHistoryItem> {
        self.state.borrow().watch_history.clone()
    }

    pub fn history_entry(&self, media_id: u32, media_type: MediaType) -> Option<WatchHistoryItem> {
        let key = MediaKey::new(media_id, media_type);
        self.state
            .borrow()
            .watch_history
            .iter()
            .find(|item| item.key() == key)
            .cloned()
    }

    pub fn set_authenticated(&self, value: bool) {
        self.mutate("set_authenticated", |state| {
            if state.is_authenticated == value {
                return false;
            }
            state.is_authenticated = value;
            true
        });
    }

    /// Add a title unless it is already listed. Returns whether it was added.
    pub fn add_to_watchlist(&self, media_id: u32, media_type: MediaType) -> bool {
        let key = MediaKey::new(media_id, media_type);
        self.mutate("add_to_watchlist", |state| {
            if state.watchlist.iter().any(|item| item.key() == key) {
                return false;
            }
            state.watchlist.push(WatchlistItem::new(key, Utc::now()));
            true
        })
    }

    /// Remove a title if listed. Returns whether anything was removed.
    pub fn remove_from_watchlist(&self, media_id: u32, media_type: MediaType) -> bool {
        let key = MediaKey::new(media_id, media_type);
        self.mutate("remove_from_watchlist", |state| {
            let before = state.watchlist.len();
            state.watchlist.retain(|item| item.key() != key);
            state.watchlist.len() != before
        })
    }

    pub fn is_in_watchlist(&self, media_id: u32, media_type: MediaType) -> bool {
        let key = MediaKey::new(media_id, media_type);
        self.state.borrow().watchlist.iter().any(|item| item.key() == key)
    }

    /// Record a watch. An earlier record of the same title is replaced and the
    /// fresh record moves to the front; the list never exceeds the history limit.
    pub fn add_to_watch_history(&self, media_id: u32, media_type: MediaType, progress: f64) {
        let key = MediaKey::new(media_id, media_type);
        let limit = self.history_limit;
        self.mutate("add_to_watch_history", |state| {
            state.watch_history.retain(|item| item.key() != key);
            state
                .watch_history
                .insert(0, WatchHistoryItem::new(key, Utc::now(), progress));
            state.watch_history.truncate(limit);
            true
        });
    }

    pub fn clear_watch_history(&self) {
        self.mutate("clear_watch_history", |state| {
            if state.watch_history.is_empty() {
                return false;
            }
            state.watch_history.clear();
            true
        });
    }

    pub fn clear_watchlist(&self) {
        self.mutate("clear_watchlist", |state| {
            if state.watchlist.is_empty() {
                return false;
            }
            state.watchlist.clear();
            true
        });
    }

    fn mutate<F>(&self, operation: &'static str, modify: F) -> bool
    where
        F: FnOnce(&mut UserState) -> bool,
    {
        // Held across the change and its save so an older snapshot never lands last
        let _guard = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let changed = self.state.send_if_modified(modify);
        if changed {
            debug!(operation = operation, "User state changed");
            self.persist(operation);
        }
        changed
    }

    fn persist(&self, operation: &'static str) {
        let snapshot = self.snapshot();
        if let Err(e) = self.storage.save(&snapshot) {
            warn!(
                operation = operation,
                error = %e,
                "Failed to persist user state; keeping in-memory state"
            );
        }
    }
}
