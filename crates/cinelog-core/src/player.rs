//! Playback sessions and periodic watch-history updates.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{anyhow, Result};
use cinelog_config::PlayerConfig;
use cinelog_models::{CurrentMedia, MediaKey};
use cinelog_tmdb::EmbedUrls;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::store::{UiStore, UserStore};

pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_ASSUMED_PROGRESS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    pub interval: Duration,
    pub progress: f64,
}

impl TrackerSettings {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.progress_interval_secs.max(1)),
            progress: config.assumed_progress,
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_PROGRESS_INTERVAL,
            progress: DEFAULT_ASSUMED_PROGRESS,
        }
    }
}

struct ActiveTimer {
    key: MediaKey,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Records watch progress for whatever is playing, once per interval.
///
/// A tracker drives at most one timer. Starting it again replaces the
/// running timer; stopping or dropping the tracker cancels it, after which
/// no further history writes happen.
pub struct ProgressTracker {
    store: Arc<UserStore>,
    settings: TrackerSettings,
    active: Mutex<Option<ActiveTimer>>,
}

impl ProgressTracker {
    pub fn new(store: Arc<UserStore>, settings: TrackerSettings) -> Self {
        Self {
            store,
            settings,
            active: Mutex::new(None),
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveTimer>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Begin ticking for `key`. The first write happens one interval from now.
    pub fn start(&self, key: MediaKey) {
        let mut active = self.active();
        if let Some(previous) = active.take() {
            debug!(operation = "progress_tracker", media = %previous.key, "Replacing running timer");
            previous.token.cancel();
            previous.handle.abort();
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let store = Arc::clone(&self.store);
        let TrackerSettings { interval, progress } = self.settings;
        let first_tick = Instant::now() + interval;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        debug!(operation = "progress_tracker", media = %key, progress, "Recording progress");
                        store.add_to_watch_history(key.media_id, key.media_type, progress);
                    }
                }
            }
        });

        *active = Some(ActiveTimer { key, token, handle });
    }

    pub fn stop(&self) {
        if let Some(timer) = self.active().take() {
            debug!(operation = "progress_tracker", media = %timer.key, "Stopping timer");
            timer.token.cancel();
            timer.handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.active().is_some()
    }

    pub fn current(&self) -> Option<MediaKey> {
        self.active().as_ref().map(|timer| timer.key)
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// An open player: the UI descriptor, its embed URL and a running tracker.
///
/// Closing (or dropping) the session stops the tracker and resets the
/// player state.
pub struct WatchSession {
    ui: Arc<UiStore>,
    tracker: ProgressTracker,
    media: CurrentMedia,
    embed_url: String,
}

impl WatchSession {
    pub fn open(
        ui: Arc<UiStore>,
        store: Arc<UserStore>,
        embeds: &EmbedUrls,
        media: CurrentMedia,
        settings: TrackerSettings,
    ) -> Result<Self> {
        let embed_url = embeds
            .for_media(&media)
            .ok_or_else(|| anyhow!("Cannot play '{}': incomplete media descriptor", media.title))?;
        let key = match (media.id, media.media_type) {
            (Some(id), Some(media_type)) => MediaKey::new(id, media_type),
            _ => return Err(anyhow!("Cannot play '{}': missing id or type", media.title)),
        };

        info!(operation = "watch_session", media = %key, url = %embed_url, "Opening player");
        ui.set_current_media(media.clone());

        let tracker = ProgressTracker::new(store, settings);
        tracker.start(key);

        Ok(Self {
            ui,
            tracker,
            media,
            embed_url,
        })
    }

    pub fn embed_url(&self) -> &str {
        &self.embed_url
    }

    pub fn media(&self) -> &CurrentMedia {
        &self.media
    }

    /// Shrink to the miniplayer, or bring it back to full size
    pub fn set_minimized(&self, minimized: bool) {
        self.ui.set_miniplayer(minimized);
    }

    pub fn close(self) {
        info!(operation = "watch_session", title = %self.media.title, "Closing player");
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.tracker.stop();
        self.ui.reset_player();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::PlayerPhase;
    use cinelog_models::MediaType;

    fn user_store() -> (Arc<UserStore>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = Arc::new(UserStore::new(storage.clone(), 100));
        (store, storage)
    }

    fn settings() -> TrackerSettings {
        TrackerSettings {
            interval: Duration::from_secs(10),
            progress: 50.0,
        }
    }

    /// Let the spawned timer task observe the advanced clock
    async fn advance(duration: Duration) {
        tokio::time::advance(duration).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracker_writes_once_per_interval() {
        let (store, _) = user_store();
        let tracker = ProgressTracker::new(store.clone(), settings());
        tracker.start(MediaKey::movie(42));

        advance(Duration::from_secs(9)).await;
        assert!(store.watch_history().is_empty());

        advance(Duration::from_secs(1)).await;
        let history = store.watch_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].media_id, 42);
        assert_eq!(history[0].progress, 50.0);

        advance(Duration::from_secs(10)).await;
        // Same title is upserted, not appended
        assert_eq!(store.watch_history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_and_drop_end_writes() {
        let (store, storage) = user_store();
        let tracker = ProgressTracker::new(store.clone(), settings());
        tracker.start(MediaKey::movie(1));
        advance(Duration::from_secs(10)).await;
        let saves = storage.save_count();
        assert!(saves >= 1);

        tracker.stop();
        assert!(!tracker.is_running());
        advance(Duration::from_secs(60)).await;
        assert_eq!(storage.save_count(), saves);

        tracker.start(MediaKey::tv(2));
        drop(tracker);
        advance(Duration::from_secs(60)).await;
        assert!(store.history_entry(2, MediaType::Tv).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_timer() {
        let (store, _) = user_store();
        let tracker = ProgressTracker::new(store.clone(), settings());
        tracker.start(MediaKey::movie(1));
        tracker.start(MediaKey::movie(2));
        assert_eq!(tracker.current(), Some(MediaKey::movie(2)));

        advance(Duration::from_secs(10)).await;
        let history = store.watch_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].media_id, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_session_lifecycle() {
        let (store, _) = user_store();
        let ui = Arc::new(UiStore::new());
        let embeds = EmbedUrls::default();

        let session = WatchSession::open(
            ui.clone(),
            store.clone(),
            &embeds,
            CurrentMedia::episode(1399, "Game of Thrones", 1, 2),
            settings(),
        )
        .unwrap();

        assert_eq!(session.embed_url(), "https://animzoon.com/embed/1399-1-2");
        assert_eq!(ui.phase(), PlayerPhase::Playing);
        session.set_minimized(true);
        assert!(ui.is_miniplayer());

        advance(Duration::from_secs(10)).await;
        assert!(store.history_entry(1399, MediaType::Tv).is_some());

        session.close();
        assert_eq!(ui.phase(), PlayerPhase::Idle);
        assert!(!ui.is_miniplayer());
    }

    #[tokio::test]
    async fn test_watch_session_rejects_incomplete_media() {
        let (store, _) = user_store();
        let ui = Arc::new(UiStore::new());
        let mut media = CurrentMedia::episode(5, "Show", 1, 1);
        media.episode = None;

        let result = WatchSession::open(ui.clone(), store, &EmbedUrls::default(), media, settings());
        assert!(result.is_err());
        assert_eq!(ui.phase(), PlayerPhase::Idle);
    }

    #[test]
    fn test_settings_from_config() {
        let config = PlayerConfig::default();
        let settings = TrackerSettings::from_config(&config);
        assert_eq!(settings, TrackerSettings::default());
    }
}
