use shared::error::PriceError;
use thiserror::Error;

/// Failure of a single classification round trip. Never fatal: the caller
/// shows it and the list stays as it was.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read image '{uri}': {source}")]
    ReadImage {
        uri: String,
        #[source]
        source: std::io::Error,
    },
    #[error("classification request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("classification endpoint answered with status {0}")]
    Status(u16),
    #[error("malformed classification response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("classification returned an unusable price: {0}")]
    InvalidPrice(#[from] PriceError),
}
