//! Error types for grading and quiz generation.
//!
//! Provider errors live here so the study pipeline can downcast and
//! classify them for retry decisions without string matching.

use thiserror::Error;

/// Errors raised while grading a quiz or recording selections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    /// Grading was requested for an empty quiz.
    #[error("quiz could not be generated: there are no questions to grade")]
    NoQuestions,

    /// A selection referenced a question that does not exist.
    #[error("question {number} does not exist (quiz has {total} questions)")]
    UnknownQuestion { number: usize, total: usize },

    /// A selection referenced an option that the question does not have.
    #[error("question {number} has no option {option}")]
    UnknownOption { number: usize, option: String },
}

/// Errors that can occur when talking to a quiz generator backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend asked us to slow down.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The requested model is not available on the backend.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The backend returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(self, ProviderError::ModelNotFound(_))
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}
