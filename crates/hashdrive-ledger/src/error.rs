use std::io;

/// Errors produced by registry ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger backend could not be reached or refused the call.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The ledger accepted the call but rejected the append.
    #[error("append rejected: {reason}")]
    Rejected { reason: String },

    /// The call did not complete within the configured bound.
    #[error("ledger call timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// A lock guarding in-process ledger state was poisoned.
    #[error("ledger state lock poisoned")]
    LockPoisoned,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
