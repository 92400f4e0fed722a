//! Page loaders: everything one view needs, fetched concurrently.
//!
//! Each loader joins its requests all-or-nothing, so a view either gets a
//! complete data set or an error. Missing titles on detail pages are a
//! normal outcome and come back as [`Detail::NotFound`].

use cinelog_models::{Episode, MediaType, Movie, SearchHit, SeasonDetails, TvShow};
use cinelog_tmdb::{get_movies_by_id, get_tv_shows_by_id, CatalogSource, TmdbError};
use tracing::{debug, info};

use crate::pagination::MAX_SEARCH_PAGES;

/// Curated movie ids shown in the "featured" rows
pub const FEATURED_MOVIE_IDS: &[u32] = &[
    11653, 8584, 56238, 10257, 492008, 615453, 452196, 579974, 49529, 87101, 296, 51497, 198663,
    574302, 505513, 602666, 14756, 449924, 9460, 81870, 10618, 18665, 11143, 17809, 224141, 280,
    14863, 18672, 66657, 53168,
];

/// Curated TV ids shown in the "featured" rows
pub const FEATURED_TV_IDS: &[u32] = &[
    96997, 5953, 216445, 137870, 76557, 48393, 99317, 123794, 222671, 210732, 49051, 71673, 106617,
    127138, 32231, 214997, 86051, 90403, 61670,
];

/// The home page only shows the head of each curated list
pub const HOME_FEATURED_LIMIT: usize = 15;

const HERO_MOVIES: usize = 3;
const HERO_TV: usize = 2;

#[derive(Debug, Clone)]
pub struct HomeFeed {
    pub trending_movies: Vec<Movie>,
    pub trending_tv: Vec<TvShow>,
    pub top_rated_movies: Vec<Movie>,
    pub top_rated_tv: Vec<TvShow>,
    pub featured_movies: Vec<Movie>,
    pub featured_tv: Vec<TvShow>,
}

/// A title in the hero carousel
#[derive(Debug, Clone, Copy)]
pub enum HeroItem<'a> {
    Movie(&'a Movie),
    Tv(&'a TvShow),
}

impl HeroItem<'_> {
    pub fn id(&self) -> u32 {
        match self {
            HeroItem::Movie(m) => m.id,
            HeroItem::Tv(t) => t.id,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            HeroItem::Movie(_) => MediaType::Movie,
            HeroItem::Tv(_) => MediaType::Tv,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            HeroItem::Movie(m) => &m.title,
            HeroItem::Tv(t) => &t.name,
        }
    }
}

impl HomeFeed {
    /// Three trending movies followed by two trending shows
    pub fn hero_items(&self) -> Vec<HeroItem<'_>> {
        self.trending_movies
            .iter()
            .take(HERO_MOVIES)
            .map(HeroItem::Movie)
            .chain(self.trending_tv.iter().take(HERO_TV).map(HeroItem::Tv))
            .collect()
    }
}

pub async fn load_home<S>(source: &S) -> Result<HomeFeed, TmdbError>
where
    S: CatalogSource + ?Sized,
{
    info!(operation = "load_home", source = source.source_name(), "Loading home feed");

    let movie_ids = &FEATURED_MOVIE_IDS[..HOME_FEATURED_LIMIT.min(FEATURED_MOVIE_IDS.len())];
    let tv_ids = &FEATURED_TV_IDS[..HOME_FEATURED_LIMIT.min(FEATURED_TV_IDS.len())];

    let (trending_movies, trending_tv, top_rated_movies, top_rated_tv, featured_movies, featured_tv) =
        futures::try_join!(
            source.trending_movies(),
            source.trending_tv(),
            source.top_rated_movies(),
            source.top_rated_tv(),
            get_movies_by_id(source, movie_ids),
            get_tv_shows_by_id(source, tv_ids)
        )?;

    Ok(HomeFeed {
        trending_movies: trending_movies.results,
        trending_tv: trending_tv.results,
        top_rated_movies: top_rated_movies.results,
        top_rated_tv: top_rated_tv.results,
        featured_movies,
        featured_tv,
    })
}

/// Data behind the movie or TV listing page
#[derive(Debug, Clone)]
pub struct ListingPage<T> {
    pub trending: Vec<T>,
    pub top_rated: Vec<T>,
    /// The full curated list; paginate it with [`crate::pagination::paginate`]
    pub catalog: Vec<T>,
}

pub async fn load_movies_page<S>(source: &S) -> Result<ListingPage<Movie>, TmdbError>
where
    S: CatalogSource + ?Sized,
{
    debug!(operation = "load_movies_page", "Loading movie listing");
    let (trending, top_rated, catalog) = futures::try_join!(
        source.trending_movies(),
        source.top_rated_movies(),
        get_movies_by_id(source, FEATURED_MOVIE_IDS)
    )?;

    Ok(ListingPage {
        trending: trending.results,
        top_rated: top_rated.results,
        catalog,
    })
}

pub async fn load_tv_page<S>(source: &S) -> Result<ListingPage<TvShow>, TmdbError>
where
    S: CatalogSource + ?Sized,
{
    debug!(operation = "load_tv_page", "Loading TV listing");
    let (trending, top_rated, catalog) = futures::try_join!(
        source.trending_tv(),
        source.top_rated_tv(),
        get_tv_shows_by_id(source, FEATURED_TV_IDS)
    )?;

    Ok(ListingPage {
        trending: trending.results,
        top_rated: top_rated.results,
        catalog,
    })
}

/// Outcome of a detail page load
#[derive(Debug, Clone, PartialEq)]
pub enum Detail<T> {
    Found(T),
    NotFound,
}

impl<T> Detail<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Detail::Found(value) => Some(value),
            Detail::NotFound => None,
        }
    }

    fn from_result(result: Result<T, TmdbError>) -> Result<Self, TmdbError> {
        match result {
            Ok(value) => Ok(Detail::Found(value)),
            Err(e) if e.is_not_found() => Ok(Detail::NotFound),
            Err(e) => Err(e),
        }
    }
}

pub async fn load_movie_detail<S>(source: &S, id: u32) -> Result<Detail<Movie>, TmdbError>
where
    S: CatalogSource + ?Sized,
{
    debug!(operation = "load_movie_detail", id, "Loading movie");
    Detail::from_result(source.movie_details(id).await)
}

pub async fn load_tv_detail<S>(source: &S, id: u32) -> Result<Detail<TvShow>, TmdbError>
where
    S: CatalogSource + ?Sized,
{
    debug!(operation = "load_tv_detail", id, "Loading TV show");
    Detail::from_result(source.tv_details(id).await)
}

/// Everything the episode player page shows
#[derive(Debug, Clone)]
pub struct EpisodeView {
    pub show: TvShow,
    pub season: SeasonDetails,
    pub episode: Episode,
}

pub async fn load_episode<S>(
    source: &S,
    tv_id: u32,
    season: u32,
    episode: u32,
) -> Result<Detail<EpisodeView>, TmdbError>
where
    S: CatalogSource + ?Sized,
{
    debug!(operation = "load_episode", tv_id, season, episode, "Loading episode");
    let joined = futures::try_join!(
        source.tv_details(tv_id),
        source.season_details(tv_id, season),
        source.episode_details(tv_id, season, episode)
    );
    Detail::from_result(joined.map(|(show, season, episode)| EpisodeView {
        show,
        season,
        episode,
    }))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchFilter {
    #[default]
    All,
    Movie,
    Tv,
}

impl SearchFilter {
    fn accepts(self, hit: &SearchHit) -> bool {
        match (self, hit) {
            (SearchFilter::All, hit) => hit.is_title(),
            (SearchFilter::Movie, SearchHit::Movie(_)) => true,
            (SearchFilter::Tv, SearchHit::Tv(_)) => true,
            _ => false,
        }
    }
}

impl From<Option<MediaType>> for SearchFilter {
    fn from(media_type: Option<MediaType>) -> Self {
        match media_type {
            None => SearchFilter::All,
            Some(MediaType::Movie) => SearchFilter::Movie,
            Some(MediaType::Tv) => SearchFilter::Tv,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub query: String,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    /// Movie and TV hits only
    pub results: Vec<SearchHit>,
}

impl SearchResults {
    pub fn filtered(&self, filter: SearchFilter) -> Vec<&SearchHit> {
        self.results.iter().filter(|hit| filter.accepts(hit)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Multi-search narrowed to titles. A blank query short-circuits to an
/// empty result without touching the network.
pub async fn search<S>(source: &S, query: &str, page: u32) -> Result<SearchResults, TmdbError>
where
    S: CatalogSource + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchResults::default());
    }

    let page = page.clamp(1, MAX_SEARCH_PAGES);
    info!(operation = "search", query, page, "Searching catalog");
    let paged = source.search_multi(query, page).await?;

    let results: Vec<SearchHit> = paged.results.into_iter().filter(SearchHit::is_title).collect();
    debug!(operation = "search", hits = results.len(), "Search finished");

    Ok(SearchResults {
        query: query.to_string(),
        page: paged.page,
        total_pages: paged.total_pages.min(MAX_SEARCH_PAGES),
        total_results: paged.total_results,
        results,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use cinelog_models::{Paged, PersonSummary};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub fn movie(id: u32) -> Movie {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Movie {id}"),
            "poster_path": null,
            "backdrop_path": null,
            "release_date": "2020-01-01",
            "vote_average": 7.0
        }))
        .unwrap()
    }

    pub fn show(id: u32) -> TvShow {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Show {id}"),
            "poster_path": null,
            "backdrop_path": null,
            "first_air_date": "2019-05-01"
        }))
        .unwrap()
    }

    fn paged<T>(results: Vec<T>, total_pages: u32) -> Paged<T> {
        let total_results = results.len() as u32;
        Paged {
            page: 1,
            results,
            total_pages,
            total_results,
        }
    }

    /// In-memory catalog. Ids in `missing` answer 404, ids in `broken`
    /// answer 500, and `offline` fails every call.
    #[derive(Default)]
    pub struct FakeCatalog {
        pub missing: HashSet<u32>,
        pub broken: HashSet<u32>,
        pub offline: bool,
        pub search_total_pages: u32,
        pub calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn check(&self, id: u32) -> Result<(), TmdbError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline || self.broken.contains(&id) {
                return Err(TmdbError::Status {
                    status: 500,
                    path: format!("/fake/{id}"),
                    body: "boom".into(),
                });
            }
            if self.missing.contains(&id) {
                return Err(TmdbError::NotFound {
                    path: format!("/fake/{id}"),
                });
            }
            Ok(())
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        fn source_name(&self) -> &str {
            "fake"
        }

        async fn trending_movies(&self) -> Result<Paged<Movie>, TmdbError> {
            self.check(0)?;
            Ok(paged((1..=10).map(movie).collect(), 1))
        }

        async fn trending_tv(&self) -> Result<Paged<TvShow>, TmdbError> {
            self.check(0)?;
            Ok(paged((101..=110).map(show).collect(), 1))
        }

        async fn top_rated_movies(&self) -> Result<Paged<Movie>, TmdbError> {
            self.check(0)?;
            Ok(paged((11..=20).map(movie).collect(), 1))
        }

        async fn top_rated_tv(&self) -> Result<Paged<TvShow>, TmdbError> {
            self.check(0)?;
            Ok(paged((111..=120).map(show).collect(), 1))
        }

        async fn movie_details(&self, id: u32) -> Result<Movie, TmdbError> {
            self.check(id)?;
            Ok(movie(id))
        }

        async fn tv_details(&self, id: u32) -> Result<TvShow, TmdbError> {
            self.check(id)?;
            Ok(show(id))
        }

        async fn season_details(&self, tv_id: u32, season: u32) -> Result<SeasonDetails, TmdbError> {
            self.check(tv_id)?;
            Ok(serde_json::from_value(serde_json::json!({
                "id": tv_id * 100 + season,
                "name": format!("Season {season}"),
                "season_number": season,
                "poster_path": null,
                "air_date": null,
                "episodes": []
            }))
            .unwrap())
        }

        async fn episode_details(&self, tv_id: u32, season: u32, episode: u32) -> Result<Episode, TmdbError> {
            self.check(tv_id)?;
            Ok(serde_json::from_value(serde_json::json!({
                "id": tv_id * 1000 + episode,
                "name": format!("Episode {episode}"),
                "episode_number": episode,
                "season_number": season,
                "air_date": "2019-05-01",
                "still_path": null,
                "runtime": 42
            }))
            .unwrap())
        }

        async fn search_multi(&self, query: &str, page: u32) -> Result<Paged<SearchHit>, TmdbError> {
            self.check(0)?;
            let results = vec![
                SearchHit::Movie(movie(1)),
                SearchHit::Person(PersonSummary {
                    id: 2,
                    name: query.to_string(),
                    profile_path: None,
                }),
                SearchHit::Tv(show(3)),
                SearchHit::Unknown,
                SearchHit::Movie(movie(4)),
            ];
            Ok(Paged {
                page,
                total_pages: self.search_total_pages,
                total_results: results.len() as u32,
                results,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeCatalog;
    use super::*;

    #[tokio::test]
    async fn test_home_feed() {
        let catalog = FakeCatalog::default();
        let feed = load_home(&catalog).await.unwrap();

        assert_eq!(feed.featured_movies.len(), HOME_FEATURED_LIMIT);
        assert_eq!(feed.featured_tv.len(), HOME_FEATURED_LIMIT);
        assert_eq!(feed.featured_movies[0].id, FEATURED_MOVIE_IDS[0]);
        // 4 listings + 15 + 15 lookups
        assert_eq!(catalog.calls(), 34);

        let hero: Vec<(MediaType, u32)> = feed.hero_items().iter().map(|h| (h.media_type(), h.id())).collect();
        assert_eq!(
            hero,
            vec![
                (MediaType::Movie, 1),
                (MediaType::Movie, 2),
                (MediaType::Movie, 3),
                (MediaType::Tv, 101),
                (MediaType::Tv, 102),
            ]
        );
    }

    #[tokio::test]
    async fn test_home_feed_fails_as_a_whole() {
        let mut catalog = FakeCatalog::default();
        catalog.broken.insert(FEATURED_TV_IDS[3]);
        assert!(load_home(&catalog).await.is_err());
    }

    #[tokio::test]
    async fn test_listing_pages_use_full_curated_lists() {
        let catalog = FakeCatalog::default();
        let movies = load_movies_page(&catalog).await.unwrap();
        assert_eq!(movies.catalog.len(), FEATURED_MOVIE_IDS.len());
        assert_eq!(movies.trending.len(), 10);

        let tv = load_tv_page(&catalog).await.unwrap();
        assert_eq!(tv.catalog.len(), FEATURED_TV_IDS.len());
        assert_eq!(tv.top_rated[0].id, 111);
    }

    #[tokio::test]
    async fn test_detail_not_found_is_not_an_error() {
        let mut catalog = FakeCatalog::default();
        catalog.missing.insert(404);
        catalog.broken.insert(500);

        assert_eq!(load_movie_detail(&catalog, 404).await.unwrap(), Detail::NotFound);
        assert!(load_movie_detail(&catalog, 500).await.is_err());
        assert_eq!(load_movie_detail(&catalog, 7).await.unwrap().found().unwrap().id, 7);
        assert_eq!(load_tv_detail(&catalog, 404).await.unwrap(), Detail::NotFound);
    }

    #[tokio::test]
    async fn test_load_episode() {
        let catalog = FakeCatalog::default();
        let view = load_episode(&catalog, 9, 2, 5).await.unwrap().found().unwrap();
        assert_eq!(view.show.id, 9);
        assert_eq!(view.season.season_number, 2);
        assert_eq!(view.episode.episode_number, 5);

        let mut catalog = FakeCatalog::default();
        catalog.missing.insert(9);
        assert!(load_episode(&catalog, 9, 2, 5).await.unwrap().found().is_none());
    }

    #[tokio::test]
    async fn test_search_keeps_titles_and_caps_pages() {
        let catalog = FakeCatalog {
            search_total_pages: 87,
            ..Default::default()
        };
        let results = search(&catalog, "  alien ", 1).await.unwrap();

        assert_eq!(results.query, "alien");
        assert_eq!(results.total_pages, MAX_SEARCH_PAGES);
        assert_eq!(results.results.len(), 3);
        assert!(results.results.iter().all(SearchHit::is_title));

        assert_eq!(results.filtered(SearchFilter::All).len(), 3);
        assert_eq!(results.filtered(SearchFilter::Movie).len(), 2);
        assert_eq!(results.filtered(SearchFilter::Tv).len(), 1);
    }

    #[tokio::test]
    async fn test_search_page_is_clamped_and_blank_query_skips_network() {
        let catalog = FakeCatalog {
            search_total_pages: 3,
            ..Default::default()
        };
        let results = search(&catalog, "x", 50).await.unwrap();
        assert_eq!(results.page, MAX_SEARCH_PAGES);
        assert_eq!(results.total_pages, 3);

        let before = catalog.calls();
        let empty = search(&catalog, "   ", 1).await.unwrap();
        assert!(empty.is_empty());
        assert_eq!(catalog.calls(), before);
    }

    #[test]
    fn test_filter_from_media_type() {
        assert_eq!(SearchFilter::from(None), SearchFilter::All);
        assert_eq!(SearchFilter::from(Some(MediaType::Tv)), SearchFilter::Tv);
    }
}
