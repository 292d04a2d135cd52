use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid timeout: {0} seconds (must be greater than zero)")]
    InvalidTimeout(u64),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
