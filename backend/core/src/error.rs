use thiserror::Error;

/// Top-level error type for the scanlens runtime.
#[derive(Debug, Error)]
pub enum ScanLensError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("model provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("no scan image supplied")]
    MissingImage,

    #[error("not a supported image: {0}")]
    UnsupportedImage(String),

    #[error("relay returned HTTP {0}")]
    RelayStatus(u16),

    #[error("malformed report payload: {0}")]
    MalformedReport(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
