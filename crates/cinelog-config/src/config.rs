use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::credentials::CredentialStore;

/// Environment variables checked for the TMDB API key, highest priority first
pub const API_KEY_ENV_VARS: [&str; 2] = ["CINELOG_TMDB_API_KEY", "TMDB_API_KEY"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// Usually left empty and supplied via env or the credential store
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_embed_base_url")]
    pub embed_base_url: String,
    /// How often an open player writes watch history
    #[serde(default = "default_progress_interval_secs")]
    pub progress_interval_secs: u64,
    /// Progress recorded on each tick; the embed iframe does not report its position
    #[serde(default = "default_assumed_progress")]
    pub assumed_progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: Option<bool>,
    pub file: Option<PathBuf>,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_embed_base_url() -> String {
    "https://animzoon.com/embed".to_string()
}

fn default_progress_interval_secs() -> u64 {
    10
}

fn default_assumed_progress() -> f64 {
    50.0
}

fn default_namespace() -> String {
    "user-storage".to_string()
}

fn default_history_limit() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_tmdb_base_url(),
            image_base_url: default_image_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            embed_base_url: default_embed_base_url(),
            progress_interval_secs: default_progress_interval_secs(),
            assumed_progress: default_assumed_progress(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: None,
            file: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if present, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.base_url cannot be empty"));
        }
        if self.tmdb.image_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.image_base_url cannot be empty"));
        }
        if self.tmdb.timeout_secs == 0 {
            return Err(anyhow::anyhow!("tmdb.timeout_secs must be greater than zero"));
        }
        if self.player.embed_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("player.embed_base_url cannot be empty"));
        }
        if self.player.progress_interval_secs == 0 {
            return Err(anyhow::anyhow!("player.progress_interval_secs must be greater than zero"));
        }
        if !(0.0..=100.0).contains(&self.player.assumed_progress) {
            return Err(anyhow::anyhow!("player.assumed_progress must be between 0 and 100"));
        }
        if self.storage.namespace.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.namespace cannot be empty"));
        }
        if self.storage.history_limit == 0 {
            return Err(anyhow::anyhow!("storage.history_limit must be greater than zero"));
        }
        Ok(())
    }

    /// Resolve the TMDB API key: environment, then credential store, then config file
    pub fn resolve_api_key(&self, credentials: Option<&CredentialStore>) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok(), credentials)
    }

    pub fn resolve_api_key_with<F>(&self, env: F, credentials: Option<&CredentialStore>) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| env(name))
            .find(|value| !value.trim().is_empty())
            .or_else(|| credentials.and_then(|c| c.get_tmdb_api_key().cloned()))
            .or_else(|| {
                let key = self.tmdb.api_key.trim();
                (!key.is_empty()).then(|| key.to_string())
            })
    }
}
