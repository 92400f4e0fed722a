use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media::{MediaKey, MediaType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryItem {
    pub id: String, // Composite "type-mediaId" key
    pub media_id: u32,
    pub media_type: MediaType,
    pub watched_at: DateTime<Utc>,
    pub progress: f64, // Percentage, 0-100
}

impl WatchHistoryItem {
    pub fn new(key: MediaKey, watched_at: DateTime<Utc>, progress: f64) -> Self {
        Self {
            id: key.composite_id(),
            media_id: key.media_id,
            media_type: key.media_type,
            watched_at,
            progress: clamp_progress(progress),
        }
    }

    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.media_id, self.media_type)
    }
}

/// Clamp a progress percentage into `[0, 100]`. Non-finite input becomes 0.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_progress() {
        assert_eq!(clamp_progress(50.0), 50.0);
        assert_eq!(clamp_progress(-3.0), 0.0);
        assert_eq!(clamp_progress(140.0), 100.0);
        assert_eq!(clamp_progress(f64::NAN), 0.0);
        assert_eq!(clamp_progress(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_new_item_uses_composite_id() {
        let item = WatchHistoryItem::new(MediaKey::tv(42), Utc::now(), 250.0);
        assert_eq!(item.id, "tv-42");
        assert_eq!(item.progress, 100.0);
    }
}
