use thiserror::Error;

/// Errors raised while decoding, encoding or rendering workout documents.
#[derive(Debug, Error)]
pub enum WorkoutError {
    /// A wire field has the wrong shape (non-numeric string, object where a
    /// list is expected, invalid JSON text, ...).
    #[error("malformed input at {path}: {reason}")]
    MalformedInput { path: String, reason: String },

    /// A string is not a member of the target vocabulary.
    #[error("unknown {vocabulary} token `{token}`")]
    UnknownEnumToken {
        vocabulary: &'static str,
        token: String,
    },

    /// The step tree cannot be expressed (repeat block inside a repeat block).
    #[error("unsupported structure: {0}")]
    UnsupportedStructure(String),

    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl WorkoutError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        WorkoutError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkoutError>;
