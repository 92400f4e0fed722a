use cinelog_models::CurrentMedia;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub is_miniplayer: bool,
    pub current_media: CurrentMedia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Idle,
    Playing,
}

impl UiState {
    pub fn phase(&self) -> PlayerPhase {
        if self.current_media.is_empty() {
            PlayerPhase::Idle
        } else {
            PlayerPhase::Playing
        }
    }
}

/// Transient player state: miniplayer visibility and what is playing.
///
/// Never persisted. The miniplayer flag is independent of the media
/// descriptor; callers decide whether showing an idle miniplayer makes sense.
pub struct UiStore {
    state: watch::Sender<UiState>,
}

impl UiStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(UiState::default());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn is_miniplayer(&self) -> bool {
        self.state.borrow().is_miniplayer
    }

    pub fn current_media(&self) -> CurrentMedia {
        self.state.borrow().current_media.clone()
    }

    pub fn phase(&self) -> PlayerPhase {
        self.state.borrow().phase()
    }

    pub fn set_miniplayer(&self, value: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.is_miniplayer != value;
            state.is_miniplayer = value;
            changed
        });
    }

    /// Replace the descriptor wholesale; nothing from the previous one is kept
    pub fn set_current_media(&self, media: CurrentMedia) {
        debug!(operation = "set_current_media", id = ?media.id, title = %media.title, "Player media changed");
        self.state.send_if_modified(|state| {
            let changed = state.current_media != media;
            state.current_media = media;
            changed
        });
    }

    /// Hide the miniplayer and clear the media descriptor in one update
    pub fn reset_player(&self) {
        self.state.send_if_modified(|state| {
            let changed = *state != UiState::default();
            *state = UiState::default();
            changed
        });
    }
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelog_models::MediaType;

    #[test]
    fn test_starts_idle() {
        let ui = UiStore::new();
        assert_eq!(ui.phase(), PlayerPhase::Idle);
        assert!(!ui.is_miniplayer());
        assert!(ui.current_media().is_empty());
    }

    #[test]
    fn test_set_current_media_replaces_wholesale() {
        let ui = UiStore::new();
        ui.set_current_media(CurrentMedia::episode(1399, "Game of Thrones", 1, 2));
        assert_eq!(ui.phase(), PlayerPhase::Playing);

        ui.set_current_media(CurrentMedia::movie(550, "Fight Club"));
        let media = ui.current_media();
        assert_eq!(media.media_type, Some(MediaType::Movie));
        assert_eq!(media.season, None);
        assert_eq!(media.episode, None);
    }

    #[test]
    fn test_miniplayer_is_independent_of_media() {
        let ui = UiStore::new();
        ui.set_miniplayer(true);
        assert!(ui.is_miniplayer());
        assert_eq!(ui.phase(), PlayerPhase::Idle);

        ui.set_current_media(CurrentMedia::movie(1, "Alien"));
        ui.set_miniplayer(false);
        assert_eq!(ui.phase(), PlayerPhase::Playing);
    }

    #[test]
    fn test_reset_player_from_any_state() {
        let states = [
            (false, CurrentMedia::default()),
            (true, CurrentMedia::default()),
            (false, CurrentMedia::movie(1, "Alien")),
            (true, CurrentMedia::episode(2, "Dark", 3, 4)),
        ];

        for (miniplayer, media) in states {
            let ui = UiStore::new();
            ui.set_miniplayer(miniplayer);
            ui.set_current_media(media);
            ui.reset_player();
            assert!(!ui.is_miniplayer());
            assert_eq!(ui.current_media().id, None);
            assert_eq!(ui.phase(), PlayerPhase::Idle);
        }
    }

    #[test]
    fn test_reset_notifies_once() {
        let ui = UiStore::new();
        ui.set_current_media(CurrentMedia::movie(1, "Alien"));
        ui.set_miniplayer(true);

        let mut rx = ui.subscribe();
        ui.reset_player();
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state, UiState::default());

        ui.reset_player();
        assert!(!rx.has_changed().unwrap());
    }
}
