//! TMDB payload types.
//!
//! TMDB omits or nulls many fields depending on the endpoint, so nearly
//! everything beyond the id is optional or defaulted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cast {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crew {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<Cast>,
    #[serde(default)]
    pub crew: Vec<Crew>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube") && self.video_type == "Trailer"
    }
}

/// `{ "results": [...] }` wrapper used by appended sub-resources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Related<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Related<T> {
    fn default() -> Self {
        Self { results: Vec::new() }
    }
}

/// One page of a paginated TMDB listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paged<T> {
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Related<Video>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar: Option<Related<Movie>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Related<Movie>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub id: u32,
    pub name: String,
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    pub episode_number: u32,
    pub season_number: u32,
    pub air_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    pub still_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    pub runtime: Option<u32>,
}

/// `/tv/{id}/season/{n}` payload: the season plus its episodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonDetails {
    pub id: u32,
    pub name: String,
    pub season_number: u32,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub air_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TvShow {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seasons: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_episodes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Vec<Season>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Related<Video>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar: Option<Related<TvShow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Related<TvShow>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonSummary {
    pub id: u32,
    pub name: String,
    pub profile_path: Option<String>,
}

/// One `/search/multi` result, discriminated by its `media_type` field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum SearchHit {
    Movie(Movie),
    Tv(TvShow),
    Person(PersonSummary),
    #[serde(other)]
    Unknown,
}

impl SearchHit {
    pub fn is_title(&self) -> bool {
        matches!(self, SearchHit::Movie(_) | SearchHit::Tv(_))
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            SearchHit::Movie(movie) => Some(&movie.title),
            SearchHit::Tv(show) => Some(&show.name),
            SearchHit::Person(person) => Some(&person.name),
            SearchHit::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_with_appended_resources() {
        let json = r#"{
            "id": 550,
            "title": "Fight Club",
            "overview": "An insomniac office worker...",
            "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "backdrop_path": null,
            "release_date": "1999-10-15",
            "vote_average": 8.4,
            "vote_count": 26280,
            "runtime": 139,
            "genres": [{"id": 18, "name": "Drama"}],
            "credits": {"cast": [{"id": 819, "name": "Edward Norton", "character": "Narrator", "profile_path": null, "order": 0}], "crew": []},
            "videos": {"results": [{"id": "v1", "key": "abc", "name": "Trailer", "site": "YouTube", "type": "Trailer"}]},
            "similar": {"results": []}
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 550);
        assert_eq!(movie.runtime, Some(139));
        assert!(movie.backdrop_path.is_none());
        assert_eq!(movie.credits.as_ref().unwrap().cast[0].character, "Narrator");
        assert!(movie.videos.as_ref().unwrap().results[0].is_youtube_trailer());
        assert!(movie.recommendations.is_none());
    }

    #[test]
    fn test_search_hits_by_media_type() {
        let json = r#"{
            "page": 1,
            "total_pages": 3,
            "total_results": 55,
            "results": [
                {"media_type": "movie", "id": 1, "title": "Alien", "poster_path": null, "backdrop_path": null},
                {"media_type": "tv", "id": 2, "name": "Andor", "poster_path": null, "backdrop_path": null},
                {"media_type": "person", "id": 3, "name": "Sigourney Weaver", "profile_path": null},
                {"media_type": "collection", "id": 4}
            ]
        }"#;

        let page: Paged<SearchHit> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results.len(), 4);
        assert!(matches!(page.results[0], SearchHit::Movie(ref m) if m.title == "Alien"));
        assert!(matches!(page.results[1], SearchHit::Tv(ref t) if t.name == "Andor"));
        assert!(!page.results[2].is_title());
        assert_eq!(page.results[3], SearchHit::Unknown);
    }

    #[test]
    fn test_season_details_defaults() {
        let json = r#"{"id": 9, "name": "Season 1", "season_number": 1, "poster_path": null, "air_date": "2019-01-01"}"#;
        let season: SeasonDetails = serde_json::from_str(json).unwrap();
        assert!(season.episodes.is_empty());
        assert_eq!(season.overview, "");
    }
}
