pub mod batch;
pub mod client;
pub mod error;
pub mod traits;
pub mod urls;

pub use batch::{get_movies_by_id, get_movies_by_id_settled, get_tv_shows_by_id, get_tv_shows_by_id_settled};
pub use client::TmdbClient;
pub use error::TmdbError;
pub use traits::CatalogSource;
pub use urls::{EmbedUrls, ImageUrls, PLACEHOLDER_IMAGE};
