use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No base URL configured (set [target].base_url, VIGIL_BASE_URL or --base-url)")]
    MissingBaseUrl,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout: {0} (must be greater than zero)")]
    InvalidTimeout(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SuiteError {
    #[error("Duplicate test case name: {0}")]
    DuplicateName(String),

    #[error("Case `{case}` depends on `{dependency}`, which is not an earlier case")]
    UnknownDependency { case: String, dependency: String },

    #[error("Case `{case}` depends on `{dependency}`, which is not a probe case")]
    NotAProbe { case: String, dependency: String },

    #[error("Case `{0}` has a zero timeout")]
    ZeroTimeout(String),

    #[error("Case `{0}` has no checks to run")]
    NoChecks(String),

    #[error("Case `{0}` compares fewer than two cases")]
    TooFewToCompare(String),

    #[error("Case `{case}` lists `{dependency}` more than once")]
    RepeatedSource { case: String, dependency: String },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
