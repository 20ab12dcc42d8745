use thiserror::Error;

/// Errors returned by the orchestrator's public API
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The operation needs READY but a run is in progress
    #[error("A run is in progress; the selection cannot change until it finishes")]
    Busy,

    /// No tag by this name
    #[error("Unknown tag: {0}")]
    UnknownTag(String),
}

/// Result alias for orchestrator operations
pub type Result<T> = std::result::Result<T, RunnerError>;
