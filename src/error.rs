use thiserror::Error;

/// Top-level error type for the camera path engine.
#[derive(Debug, Error)]
pub enum CamPathError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by path edits, queries and record import.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("segment index {index} is out of range (segment count {count})")]
    SegmentOutOfRange { index: usize, count: usize },

    #[error("knot not found: {0}")]
    KnotNotFound(&'static str),

    #[error("index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("non-finite value for {0}")]
    NonFinite(&'static str),

    #[error("invalid path record: {0}")]
    InvalidRecord(String),
}

/// Errors related to path configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidParameters(String),
}

/// Convenience type alias for results using [`CamPathError`].
pub type Result<T> = std::result::Result<T, CamPathError>;
