use serde::{Deserialize, Serialize};
use crate::watch_history::WatchHistoryItem;
use crate::watchlist::WatchlistItem;

/// Everything about a user that survives restarts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub watchlist: Vec<WatchlistItem>,
    #[serde(default)]
    pub watch_history: Vec<WatchHistoryItem>,
}
