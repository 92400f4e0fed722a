use serde::{Deserialize, Serialize};
use crate::media::MediaType;

/// Descriptor of what the player is currently showing.
///
/// The empty form (`CurrentMedia::default()`) means nothing is playing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentMedia {
    pub id: Option<u32>,
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl CurrentMedia {
    pub fn movie(id: u32, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            media_type: Some(MediaType::Movie),
            title: title.into(),
            season: None,
            episode: None,
        }
    }

    pub fn episode(id: u32, title: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            id: Some(id),
            media_type: Some(MediaType::Tv),
            title: title.into(),
            season: Some(season),
            episode: Some(episode),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }
}
