use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoopcastError {
    #[error("invalid value for '{field}', must be {expected}")]
    InvalidConfiguration { field: String, expected: String },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Track {track} is misaligned: expected {expected} entries, got {actual}")]
    TrackMisalignment {
        track: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to probe duration of {path}: {reason}")]
    ProbeFailure { path: String, reason: String },

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    MissingExecutable(#[from] which::Error),
}

impl LoopcastError {
    pub(crate) fn invalid_value(field: &str, expected: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.to_string(),
            expected: expected.into(),
        }
    }

    /// `invalid value for '<field>', must be one of [a,b,c]`
    pub(crate) fn not_one_of(field: &str, accepted: &[&str]) -> Self {
        Self::invalid_value(field, format!("one of [{}]", accepted.join(",")))
    }

    pub(crate) fn probe_failure(path: &str, reason: impl ToString) -> Self {
        Self::ProbeFailure {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type LoopcastResult<T> = Result<T, LoopcastError>;
