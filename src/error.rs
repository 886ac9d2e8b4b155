use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid base64 weight encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("pickle error: {0}")]
    Pickle(#[from] serde_pickle::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("plot rendering failed: {0}")]
    Plot(String),

    #[error("unsupported image format for {0}: only .svg is written, PDF is not supported")]
    UnsupportedFormat(PathBuf),

    #[error("population file {0} contains no candidates with a numeric avg_score")]
    EmptyPopulation(PathBuf),

    #[error("malformed candidate record {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("no weight set named '{0}' in catalog")]
    UnknownWeights(String),

    #[error("no player with name '{0}' found")]
    UnknownOpponent(String),

    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("activation log is empty")]
    EmptyLog,

    #[error("invalid action symbol '{0}' (expected C or D)")]
    InvalidAction(String),

    #[error("environment variable {0} must be set")]
    MissingCredential(&'static str),

    #[error("completion response contained no choices")]
    EmptyCompletion,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
