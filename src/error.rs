use thiserror::Error;

/// Failure kinds for the rule sync core.
///
/// Every failure is recoverable at the orchestrator boundary: `sync` returns
/// these as values, it never panics outward.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Persistence collaborator missing or unreachable.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A read or write against the store was rejected.
    #[error("storage operation failed: {0}")]
    Storage(String),

    /// The remote fetch itself failed (connect, timeout, body decode).
    #[error("network request failed: {0}")]
    Network(String),

    /// The remote answered with a non-success HTTP status.
    #[error("remote returned HTTP status {0}")]
    HttpStatus(u16),

    /// Payload is missing the required `blockRules` field.
    #[error("remote payload is missing blockRules")]
    InvalidRemoteFormat,

    /// Rule list could not be compiled into a matcher.
    #[error("pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
