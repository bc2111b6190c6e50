use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures while producing a dataset. Any of these halts the current
/// render; row-level defects never end up here (see `NormalizeReport`).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Remote source {url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Data is not a readable table: {0}")]
    Malformed(#[from] csv::Error),

    #[error("No date column found (headers: {})", headers.join(", "))]
    MissingDateColumn { headers: Vec<String> },

    #[error("Synthetic data generation failed: {0}")]
    Synthetic(String),
}

impl LoadError {
    /// Stable label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::SourceNotFound { .. } => "source_not_found",
            LoadError::Io { .. } => "io",
            LoadError::Fetch { .. } => "fetch",
            LoadError::HttpStatus { .. } => "http_status",
            LoadError::Malformed(_) => "malformed",
            LoadError::MissingDateColumn { .. } => "missing_date_column",
            LoadError::Synthetic(_) => "synthetic",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML deserialization failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, LoadError>;
