use thiserror::Error;

/// Failure to read a persisted JSON document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data source not found: {0}")]
    Missing(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data in {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::Missing(_))
    }
}
