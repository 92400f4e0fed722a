use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media::{MediaKey, MediaType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: String, // Composite "type-mediaId" key
    pub media_id: u32,
    pub media_type: MediaType,
    pub added_at: DateTime<Utc>,
}

impl WatchlistItem {
    pub fn new(key: MediaKey, added_at: DateTime<Utc>) -> Self {
        Self {
            id: key.composite_id(),
            media_id: key.media_id,
            media_type: key.media_type,
            added_at,
        }
    }

    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.media_id, self.media_type)
    }
}
