//! Promptmesh error types

use crate::stage::Worker;

/// Promptmesh error types
#[derive(Debug, thiserror::Error)]
pub enum PromptMeshError {
    // Stage/worker errors
    /// Worker process exited nonzero. The response file is not trusted.
    #[error("{worker} worker exited with status {code:?}")]
    StageExecution { worker: Worker, code: Option<i32> },

    /// Worker exited 0 but reported a failure in its response envelope.
    #[error("{worker} worker reported an error: {message}")]
    StageReported { worker: Worker, message: String },

    /// Worker exited 0 and reported no error, but the success payload is
    /// missing or references an artifact that does not exist on disk.
    #[error("{worker} worker violated its contract: {detail}")]
    StageContract { worker: Worker, detail: String },

    /// Worker process could not be started at all.
    #[error("failed to launch {worker} worker: {source}")]
    Spawn {
        worker: Worker,
        #[source]
        source: std::io::Error,
    },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Embedding errors
    #[error("embedding error: {0}")]
    Embedding(String),
}

impl PromptMeshError {
    /// Whether this error came from a pipeline stage (as opposed to
    /// configuration, I/O, or embedding machinery).
    pub fn is_stage_failure(&self) -> bool {
        matches!(
            self,
            Self::StageExecution { .. }
                | Self::StageReported { .. }
                | Self::StageContract { .. }
                | Self::Spawn { .. }
        )
    }

    /// The worker a stage failure came from, if any.
    pub fn worker(&self) -> Option<Worker> {
        match self {
            Self::StageExecution { worker, .. }
            | Self::StageReported { worker, .. }
            | Self::StageContract { worker, .. }
            | Self::Spawn { worker, .. } => Some(*worker),
            _ => None,
        }
    }
}

/// Result type alias for promptmesh operations
pub type Result<T> = std::result::Result<T, PromptMeshError>;
