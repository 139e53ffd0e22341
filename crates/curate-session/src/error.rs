use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("schema error: {0}")]
    Core(#[from] curate_core::CoreError),

    #[error("draft error: {0}")]
    Draft(#[from] DraftError),
}

/// Failure of the authoritative validation call. Never fatal to a session:
/// the last known local state is kept.
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("validation service unavailable: {0}")]
    Unavailable(String),

    #[error("validation request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft was saved for schema {found:?}, expected {expected:?}")]
    SchemaMismatch {
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
