pub mod ui;
pub mod user;

pub use ui::{PlayerPhase, UiState, UiStore};
pub use user::{UserStore, DEFAULT_HISTORY_LIMIT};
