use cinelog_config::{Config, CredentialStore, PathManager};
use cinelog_core::{JsonFileStorage, UiStore, UserStore};
use cinelog_tmdb::{EmbedUrls, ImageUrls, TmdbClient, TmdbError};
use color_eyre::eyre::{eyre, Report};
use color_eyre::Result;
use std::sync::Arc;

/// Everything a command needs, built once in `main`
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    /// Set when the config file exists but could not be used
    pub config_warning: Option<String>,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();

        let (config, config_warning) = match Config::load_or_default(&config_file).and_then(|c| {
            c.validate()?;
            Ok(c)
        }) {
            Ok(config) => (config, None),
            Err(e) => (
                Config::default(),
                Some(format!("{}: {}", config_file.display(), e)),
            ),
        };

        Ok(Self {
            paths,
            config,
            config_warning,
        })
    }

    pub fn credentials(&self) -> CredentialStore {
        let mut store = CredentialStore::new(self.paths.credentials_file());
        if let Err(e) = store.load() {
            tracing::warn!(operation = "credentials_load", error = %e, "Failed to load credentials");
        }
        store
    }

    pub fn api_key(&self) -> Option<String> {
        let credentials = self.credentials();
        self.config.resolve_api_key(Some(&credentials))
    }

    pub fn catalog(&self) -> Result<TmdbClient> {
        TmdbClient::from_config(&self.config.tmdb, self.api_key()).map_err(|e| match e {
            TmdbError::MissingApiKey => eyre!(
                "No TMDB API key configured. Set CINELOG_TMDB_API_KEY or run 'cinelog config api-key'"
            ),
            other => Report::new(other),
        })
    }

    /// User store backed by `{data_dir}/{namespace}.json`
    pub fn user_store(&self) -> Result<Arc<UserStore>> {
        self.paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create data directories: {}", e))?;
        let path = self.paths.state_file(&self.config.storage.namespace);
        let storage = Arc::new(JsonFileStorage::new(path));
        Ok(Arc::new(UserStore::load(storage, self.config.storage.history_limit)))
    }

    pub fn ui_store(&self) -> Arc<UiStore> {
        Arc::new(UiStore::new())
    }

    pub fn images(&self) -> ImageUrls {
        ImageUrls::new(self.config.tmdb.image_base_url.clone())
    }

    pub fn embeds(&self) -> EmbedUrls {
        EmbedUrls::new(self.config.player.embed_base_url.clone())
    }
}
