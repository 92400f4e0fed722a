//! Lookups of many titles by id.
//!
//! One request per id, all in flight at once. The plain variants join
//! all-or-nothing: a single failed id fails the whole batch and no partial
//! list is returned. The `_settled` variants report each id on its own.

use cinelog_models::{Movie, TvShow};
use futures::future::{join_all, try_join_all};
use tracing::{debug, warn};
use crate::error::TmdbError;
use crate::traits::CatalogSource;

pub async fn get_movies_by_id<S>(source: &S, ids: &[u32]) -> Result<Vec<Movie>, TmdbError>
where
    S: CatalogSource + ?Sized,
{
    debug!(operation = "batch_movies", count = ids.len(), "Fetching movies by id");
    try_join_all(ids.iter().map(|&id| source.movie_details(id)))
        .await
        .map_err(|e| {
            warn!(operation = "batch_movies", error = %e, "Movie batch failed");
            e
        })
}

pub async fn get_tv_shows_by_id<S>(source: &S, ids: &[u32]) -> Result<Vec<TvShow>, TmdbError>
where
    S: CatalogSource + ?Sized,
{
    debug!(operation = "batch_tv", count = ids.len(), "Fetching TV shows by id");
    try_join_all(ids.iter().map(|&id| source.tv_details(id)))
        .await
        .map_err(|e| {
            warn!(operation = "batch_tv", error = %e, "TV batch failed");
            e
        })
}

/// Settle every id independently; results keep the input order
pub async fn get_movies_by_id_settled<S>(source: &S, ids: &[u32]) -> Vec<(u32, Result<Movie, TmdbError>)>
where
    S: CatalogSource + ?Sized,
{
    let results = join_all(ids.iter().map(|&id| source.movie_details(id))).await;
    ids.iter().copied().zip(results).collect()
}

/// Settle every id independently; results keep the input order
pub async fn get_tv_shows_by_id_settled<S>(source: &S, ids: &[u32]) -> Vec<(u32, Result<TvShow, TmdbError>)>
where
    S: CatalogSource + ?Sized,
{
    let results = join_all(ids.iter().map(|&id| source.tv_details(id))).await;
    ids.iter().copied().zip(results).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cinelog_models::{Episode, Paged, SearchHit, SeasonDetails};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeCatalog {
        missing: HashSet<u32>,
        calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn failing_on(ids: &[u32]) -> Self {
            Self {
                missing: ids.iter().copied().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    fn movie(id: u32) -> Movie {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Movie {}", id),
            "poster_path": null,
            "backdrop_path": null
        }))
        .unwrap()
    }

    fn show(id: u32) -> TvShow {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Show {}", id),
            "poster_path": null,
            "backdrop_path": null
        }))
        .unwrap()
    }

    fn unused<T>() -> Result<T, TmdbError> {
        Err(TmdbError::NotFound { path: "/unused".to_string() })
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn trending_movies(&self) -> Result<Paged<Movie>, TmdbError> {
            unused()
        }
        async fn trending_tv(&self) -> Result<Paged<TvShow>, TmdbError> {
            unused()
        }
        async fn top_rated_movies(&self) -> Result<Paged<Movie>, TmdbError> {
            unused()
        }
        async fn top_rated_tv(&self) -> Result<Paged<TvShow>, TmdbError> {
            unused()
        }
        async fn movie_details(&self, id: u32) -> Result<Movie, TmdbError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.missing.contains(&id) {
                return Err(TmdbError::NotFound { path: format!("/movie/{}", id) });
            }
            Ok(movie(id))
        }
        async fn tv_details(&self, id: u32) -> Result<TvShow, TmdbError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.missing.contains(&id) {
                return Err(TmdbError::Status { status: 500, path: format!("/tv/{}", id), body: String::new() });
            }
            Ok(show(id))
        }
        async fn season_details(&self, _tv_id: u32, _season: u32) -> Result<SeasonDetails, TmdbError> {
            unused()
        }
        async fn episode_details(&self, _tv_id: u32, _season: u32, _episode: u32) -> Result<Episode, TmdbError> {
            unused()
        }
        async fn search_multi(&self, _query: &str, _page: u32) -> Result<Paged<SearchHit>, TmdbError> {
            unused()
        }
    }

    #[tokio::test]
    async fn test_batch_returns_all_in_order() {
        let catalog = FakeCatalog::failing_on(&[]);
        let movies = get_movies_by_id(&catalog, &[3, 1, 2]).await.unwrap();
        let ids: Vec<u32> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_batch_rejects_whole_batch_on_single_failure() {
        let catalog = FakeCatalog::failing_on(&[2]);
        let result = get_movies_by_id(&catalog, &[1, 2, 3]).await;
        match result {
            Err(e) => assert!(e.is_not_found()),
            Ok(partial) => panic!("expected batch failure, got {} movies", partial.len()),
        }
    }

    #[tokio::test]
    async fn test_tv_batch_rejects_on_server_error() {
        let catalog = FakeCatalog::failing_on(&[7]);
        assert!(get_tv_shows_by_id(&catalog, &[5, 6, 7]).await.is_err());
        assert_eq!(get_tv_shows_by_id(&catalog, &[5, 6]).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_is_empty() {
        let catalog = FakeCatalog::failing_on(&[]);
        assert!(get_movies_by_id(&catalog, &[]).await.unwrap().is_empty());
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_settled_batch_keeps_successes() {
        let catalog = FakeCatalog::failing_on(&[2]);
        let results = get_movies_by_id_settled(&catalog, &[1, 2, 3]).await;
        assert_eq!(results.len(), 3);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 3);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, 2);
        assert!(results[1].1.is_err());
        assert_eq!(results[2].1.as_ref().unwrap().title, "Movie 3");

        let shows = get_tv_shows_by_id_settled(&catalog, &[2, 4]).await;
        assert!(shows[0].1.is_err());
        assert!(shows[1].1.is_ok());
    }
}
