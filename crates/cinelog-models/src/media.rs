use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two kinds of title the catalog serves
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMediaTypeError(String);

impl fmt::Display for ParseMediaTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown media type '{}', expected 'movie' or 'tv'", self.0)
    }
}

impl std::error::Error for ParseMediaTypeError {}

impl FromStr for MediaType {
    type Err = ParseMediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" | "show" => Ok(MediaType::Tv),
            other => Err(ParseMediaTypeError(other.to_string())),
        }
    }
}

/// Identity of a title in user collections: the TMDB id plus its media type.
///
/// TMDB reuses numeric ids across movies and TV shows, so the id alone is
/// not unique.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub media_id: u32,
    pub media_type: MediaType,
}

impl MediaKey {
    pub fn new(media_id: u32, media_type: MediaType) -> Self {
        Self { media_id, media_type }
    }

    pub fn movie(media_id: u32) -> Self {
        Self::new(media_id, MediaType::Movie)
    }

    pub fn tv(media_id: u32) -> Self {
        Self::new(media_id, MediaType::Tv)
    }

    /// Composite key in the form `"{type}-{id}"`, e.g. `"movie-550"`
    pub fn composite_id(&self) -> String {
        format!("{}-{}", self.media_type, self.media_id)
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.media_type, self.media_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_parse() {
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("TV".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert_eq!("show".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert!("person".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_media_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaType::Tv).unwrap(), "\"tv\"");
        assert_eq!(serde_json::to_string(&MediaType::Movie).unwrap(), "\"movie\"");
    }

    #[test]
    fn test_composite_id() {
        assert_eq!(MediaKey::movie(5).composite_id(), "movie-5");
        assert_eq!(MediaKey::tv(1399).composite_id(), "tv-1399");
    }
}
