use std::path::PathBuf;
use thiserror::Error;

/// Unreadable or invalid config. Fatal, raised before any fetch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Per-URL failure. Recorded as an absent result, never fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    TooLarge { size_mb: usize },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Cannot build HTTP client: {0}")]
    Client(String),
}

/// Template or output failure. Fatal for the remaining pages.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Render error for {filename}: {message}")]
    Render { filename: String, message: String },

    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Cannot set up feed fetching: {0}")]
    Setup(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, BuildError>;
