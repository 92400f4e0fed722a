pub mod catalog;
pub mod media;
pub mod player;
pub mod user_state;
pub mod watch_history;
pub mod watchlist;

pub use catalog::{
    Cast, Credits, Crew, Episode, Genre, Movie, Paged, PersonSummary, Related, SearchHit, Season,
    SeasonDetails, TvShow, Video,
};
pub use media::{MediaKey, MediaType, ParseMediaTypeError};
pub use player::CurrentMedia;
pub use user_state::UserState;
pub use watch_history::{clamp_progress, WatchHistoryItem};
pub use watchlist::WatchlistItem;
