pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, LoggingConfig, PlayerConfig, StorageConfig, TmdbConfig, API_KEY_ENV_VARS};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
