use herding_abm::AbmError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or validating a [`RunConfig`](crate::RunConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid run configuration: {0}")]
    Invalid(String),
}

/// Errors raised by the spectral and density estimators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("FFT needs a power-of-two point count, got {0}")]
    NotPowerOfTwo(usize),
}

/// Fatal errors of a run; the first one aborts every remaining realization
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] AbmError),

    #[error("Estimator error: {0}")]
    Stats(#[from] StatsError),

    #[error("Timeout after {limit_secs} s in realization {realization} at tick {tick}")]
    Timeout {
        realization: usize,
        tick: usize,
        limit_secs: u64,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RunError>;
