use thiserror::Error;

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("TMDB API key is not configured (set CINELOG_TMDB_API_KEY or run 'cinelog config api-key')")]
    MissingApiKey,

    #[error("TMDB resource not found: {path}")]
    NotFound { path: String },

    #[error("TMDB returned {status} for {path}: {body}")]
    Status { status: u16, path: String, body: String },

    #[error("TMDB request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode TMDB response for {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TmdbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TmdbError::NotFound { .. })
    }
}
