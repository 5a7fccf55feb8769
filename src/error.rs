// error.rs - Error type shared by the sampling, sweep and persistence layers

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures. Non-convergence of a seed is never one of these; it travels
/// through the pipeline as [`crate::Outcome::Unconverged`].
#[derive(Error, Debug)]
pub enum PhaseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("environment is missing required key `{key}`")]
    MissingKey { key: String },

    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),

    #[error("energy scale must be finite and positive, got {0}")]
    InvalidScale(f64),

    #[error("sample grid needs at least one field and one temperature point")]
    EmptyGrid,

    #[error("{}: expected {expected} records, found {found}", path.display())]
    ReplayLength {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("{}: record {line} is not valid: {source}", path.display())]
    ReplayRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type PhaseResult<T> = Result<T, PhaseError>;
