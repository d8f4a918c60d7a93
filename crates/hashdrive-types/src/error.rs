use thiserror::Error;

/// Errors produced by type parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("address must start with 0x: {0}")]
    MissingAddressPrefix(String),

    #[error("invalid content identifier: {0:?}")]
    InvalidContentId(String),

    #[error("unrecognized locator: {0:?}")]
    UnrecognizedLocator(String),
}
