use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuitionError {
    #[error("Config directory not found at {0}. Run 'tuition init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid fee for {key}: {value}. Fees must be finite and not negative.")]
    InvalidFee { key: String, value: f64 },

    #[error("Data file not found: {0}. Export it from the backend first.")]
    DataFileNotFound(PathBuf),

    #[error("Failed to parse data file {path}: {source}")]
    DataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid month '{0}'. Expected YYYY-MM (e.g., 2024-06)")]
    InvalidMonth(String),

    #[error("Invalid --status value: '{0}'. Use 'paid', 'partial', or 'unpaid'.")]
    InvalidStatusFilter(String),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Failed to write JSON output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TuitionError>;
