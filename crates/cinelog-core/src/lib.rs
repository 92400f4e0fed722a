pub mod browse;
pub mod format;
pub mod pagination;
pub mod player;
pub mod storage;
pub mod store;
pub mod task;

pub use browse::{
    load_episode, load_home, load_movie_detail, load_movies_page, load_tv_detail, load_tv_page, search,
    Detail, EpisodeView, HeroItem, HomeFeed, ListingPage, SearchFilter, SearchResults,
};
pub use format::{create_slug, format_date, format_number, format_runtime, format_vote_average, truncate_string};
pub use pagination::{page_window, paginate, total_pages, MAX_SEARCH_PAGES, PAGE_SIZE};
pub use player::{ProgressTracker, TrackerSettings, WatchSession};
pub use storage::{JsonFileStorage, MemoryStorage, StateStorage};
pub use store::{PlayerPhase, UiState, UiStore, UserStore};
pub use task::{ConsumerScope, FetchTask};
