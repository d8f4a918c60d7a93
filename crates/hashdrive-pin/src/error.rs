use thiserror::Error;

/// Errors from content store uploads.
#[derive(Debug, Error)]
pub enum PinError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("pinning request timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// The service answered with a non-2xx status.
    #[error("pinning service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("malformed pinning response: {0}")]
    MalformedResponse(String),

    /// The returned identifier is not usable in a locator.
    #[error("invalid content identifier: {0}")]
    InvalidContentId(#[from] hashdrive_types::TypeError),

    /// Credentials or endpoint are missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A lock guarding in-process store state was poisoned.
    #[error("store state lock poisoned")]
    LockPoisoned,
}

pub type PinResult<T> = Result<T, PinError>;
