use std::path::PathBuf;
use thiserror::Error;

/// Why a time-bounded invocation produced no usable result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("search did not finish within {0:?}")]
    Timeout(std::time::Duration),
    #[error("could not start search: out of resources")]
    ResourceExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The stop signal tripped before the tree was fully explored.
    #[error("search interrupted")]
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecideError {
    /// Callers must check for a terminal position before asking for a move.
    #[error("decide() called with no legal moves")]
    NoLegalMoves,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("invalid config: {0}")]
    Invalid(String),
}
