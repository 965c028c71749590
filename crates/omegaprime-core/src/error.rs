use thiserror::Error;

/// All the ways a scan can go sideways
#[derive(Error, Debug)]
pub enum Error {
    #[error("Feed fetch failed: {0}")]
    FeedError(String),

    #[error("Notification failed: {0}")]
    NotifyError(String),

    #[error("Record store failed: {0}")]
    StoreError(#[from] omegaprime_store::StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
