use std::path::PathBuf;

use crate::network::{ConnectionId, NeuronId};

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Contract violations detected at the public boundary of a `Network`.
///
/// These are programming errors: they are deterministic and never worth
/// retrying.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("Invalid shape {shape:?}: {reason}")]
    InvalidShape { shape: Vec<usize>, reason: String },

    #[error("Shape mismatch for {what}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown neuron {0}")]
    UnknownNeuron(NeuronId),

    #[error("Unknown connection {0:?}")]
    UnknownConnection(ConnectionId),
}

/// Errors raised while reading a dataset from disk.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed IDX data: {0}")]
    Malformed(String),
}

/// Errors raised while loading a run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
