//! Error taxonomy shared by extraction, training, prediction and artifact handling.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("insufficient data: need at least {required} trajectory points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("degenerate session: no usable speed samples across {points} points")]
    DegenerateSession { points: usize },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("schema mismatch: expected {expected:?}, got {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("insufficient samples: {0}")]
    InsufficientSamples(String),

    #[error("artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("corrupt model artifact: {0}")]
    CorruptArtifact(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("session {session_id}: {source}")]
    Session {
        session_id: String,
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach the id of the session being processed.
    pub fn in_session(self, session_id: impl Into<String>) -> Self {
        Error::Session {
            session_id: session_id.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error with any session context removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Session { source, .. } => source.root(),
            other => other,
        }
    }
}
