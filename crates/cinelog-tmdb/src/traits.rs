use async_trait::async_trait;
use cinelog_models::{Episode, Movie, Paged, SearchHit, SeasonDetails, TvShow};
use crate::error::TmdbError;

/// Read-only catalog of movies and TV shows.
///
/// Every call is a direct passthrough to the backing API: no caching, no
/// retry. Failures surface as `Err` and it is up to the caller to decide
/// what to render.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    // Listings
    async fn trending_movies(&self) -> Result<Paged<Movie>, TmdbError>;
    async fn trending_tv(&self) -> Result<Paged<TvShow>, TmdbError>;
    async fn top_rated_movies(&self) -> Result<Paged<Movie>, TmdbError>;
    async fn top_rated_tv(&self) -> Result<Paged<TvShow>, TmdbError>;

    // Details (with videos, credits, similar and recommendations appended)
    async fn movie_details(&self, id: u32) -> Result<Movie, TmdbError>;
    async fn tv_details(&self, id: u32) -> Result<TvShow, TmdbError>;
    async fn season_details(&self, tv_id: u32, season: u32) -> Result<SeasonDetails, TmdbError>;
    async fn episode_details(&self, tv_id: u32, season: u32, episode: u32) -> Result<Episode, TmdbError>;

    // Search across movies, TV and people
    async fn search_multi(&self, query: &str, page: u32) -> Result<Paged<SearchHit>, TmdbError>;
}
