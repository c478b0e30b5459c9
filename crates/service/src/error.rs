#![forbid(unsafe_code)]

use lt_storage::StoreError;

/// Failure kinds surfaced to the glue layer. Every failure is scoped to
/// the single operation that triggered it; none is fatal to the process.
#[derive(Debug)]
pub enum ServiceError {
    /// No current user context. Surfaced as a blocking state, never
    /// retried by the service itself.
    Unauthenticated,
    /// An underlying read or write failed; carries the upstream message.
    /// Retryable by re-triggering the operation.
    DataUnavailable(String),
    /// Rejected before any mutation; nothing was partially applied.
    ValidationFailed(String),
    /// A referenced entity could not be resolved.
    NotFound(&'static str),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "no authenticated user"),
            Self::DataUnavailable(message) => write!(f, "data unavailable: {message}"),
            Self::ValidationFailed(message) => write!(f, "validation failed: {message}"),
            Self::NotFound(what) => write!(f, "{what} not found"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::DataUnavailable(value.to_string())
    }
}
