use async_trait::async_trait;
use cinelog_config::TmdbConfig;
use cinelog_models::{Episode, Movie, Paged, SearchHit, SeasonDetails, TvShow};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use crate::error::TmdbError;
use crate::traits::CatalogSource;

const DETAIL_APPENDS: &str = "videos,credits,similar,recommendations";

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, TmdbError> {
        if api_key.trim().is_empty() {
            return Err(TmdbError::MissingApiKey);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from the `[tmdb]` config section and an already resolved key
    pub fn from_config(config: &TmdbConfig, api_key: Option<String>) -> Result<Self, TmdbError> {
        let api_key = api_key.ok_or(TmdbError::MissingApiKey)?;
        Self::new(api_key, config.base_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T, TmdbError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(path);
        debug!(operation = "tmdb_request", path = path, "TMDB request");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(operation = "tmdb_request", path = path, error = %e, "TMDB transport error");
                TmdbError::Transport(e)
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(operation = "tmdb_request", path = path, "TMDB resource not found");
            return Err(TmdbError::NotFound { path: path.to_string() });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(operation = "tmdb_request", path = path, status = status.as_u16(), "TMDB returned an error status");
            return Err(TmdbError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| TmdbError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    async fn trending_movies(&self) -> Result<Paged<Movie>, TmdbError> {
        self.get("/trending/movie/day", &[]).await
    }

    async fn trending_tv(&self) -> Result<Paged<TvShow>, TmdbError> {
        self.get("/trending/tv/day", &[]).await
    }

    async fn top_rated_movies(&self) -> Result<Paged<Movie>, TmdbError> {
        self.get("/movie/top_rated", &[]).await
    }

    async fn top_rated_tv(&self) -> Result<Paged<TvShow>, TmdbError> {
        self.get("/tv/top_rated", &[]).await
    }

    async fn movie_details(&self, id: u32) -> Result<Movie, TmdbError> {
        let path = format!("/movie/{}", id);
        self.get(&path, &[("append_to_response", DETAIL_APPENDS.to_string())]).await
    }

    async fn tv_details(&self, id: u32) -> Result<TvShow, TmdbError> {
        let path = format!("/tv/{}", id);
        self.get(&path, &[("append_to_response", DETAIL_APPENDS.to_string())]).await
    }

    async fn season_details(&self, tv_id: u32, season: u32) -> Result<SeasonDetails, TmdbError> {
        let path = format!("/tv/{}/season/{}", tv_id, season);
        self.get(&path, &[]).await
    }

    async fn episode_details(&self, tv_id: u32, season: u32, episode: u32) -> Result<Episode, TmdbError> {
        let path = format!("/tv/{}/season/{}/episode/{}", tv_id, season, episode);
        self.get(&path, &[]).await
    }

    async fn search_multi(&self, query: &str, page: u32) -> Result<Paged<SearchHit>, TmdbError> {
        let params = [
            ("query", query.to_string()),
            ("page", page.max(1).to_string()),
            ("include_adult", "false".to_string()),
        ];
        self.get("/search/multi", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_rejected() {
        let result = TmdbClient::new("  ".to_string(), "https://example.test/3".to_string(), Duration::from_secs(5));
        assert!(matches!(result, Err(TmdbError::MissingApiKey)));

        let result = TmdbClient::from_config(&TmdbConfig::default(), None);
        assert!(matches!(result, Err(TmdbError::MissingApiKey)));
    }

    #[test]
    fn test_endpoint_url_strips_trailing_slash() {
        let client = TmdbClient::new("key".to_string(), "https://example.test/3/".to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint_url("/movie/550"), "https://example.test/3/movie/550");
        assert_eq!(client.source_name(), "tmdb");
    }
}
