use cinelog_models::{CurrentMedia, MediaType};

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// Builds TMDB image URLs such as `https://image.tmdb.org/t/p/w500/abc.jpg`
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Full image URL, or the placeholder image when there is no path
    pub fn url(&self, path: Option<&str>, size: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => format!("{}/{}{}", self.base, size, path),
            None => PLACEHOLDER_IMAGE.to_string(),
        }
    }

    pub fn original(&self, path: Option<&str>) -> String {
        self.url(path, "original")
    }
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new("https://image.tmdb.org/t/p")
    }
}

/// Playback URLs on the third-party embed host
#[derive(Debug, Clone)]
pub struct EmbedUrls {
    base: String,
}

impl EmbedUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn movie(&self, id: u32) -> String {
        format!("{}/{}", self.base, id)
    }

    pub fn tv(&self, id: u32, season: u32, episode: u32) -> String {
        format!("{}/{}-{}-{}", self.base, id, season, episode)
    }

    /// Embed URL for a player descriptor. TV needs both season and episode.
    pub fn for_media(&self, media: &CurrentMedia) -> Option<String> {
        let id = media.id?;
        match media.media_type? {
            MediaType::Movie => Some(self.movie(id)),
            MediaType::Tv => Some(self.tv(id, media.season?, media.episode?)),
        }
    }
}

impl Default for EmbedUrls {
    fn default() -> Self {
        Self::new("https://animzoon.com/embed")
    }
}
