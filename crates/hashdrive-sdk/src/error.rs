use hashdrive_catalog::CatalogError;
use hashdrive_ledger::LedgerError;
use hashdrive_pin::PinError;
use hashdrive_types::ContentLocator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriveError {
    /// Pinning failed. Nothing was written to the ledger.
    #[error("upload failed: {0}")]
    Upload(#[source] PinError),

    /// Content is pinned but the ledger append failed. Retry with `locator`.
    #[error("registration of {locator} failed: {source}")]
    Registration {
        locator: ContentLocator,
        #[source]
        source: LedgerError,
    },

    /// The ledger read failed or returned data that is not a locator.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] CatalogError),

    /// The active account or network changed while the request was running.
    #[error("session changed while the request was in flight")]
    SessionReset,

    #[error("no active account")]
    NoActiveAccount,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session state lock poisoned")]
    LockPoisoned,
}

/// What a caller should do after a [`DriveError`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// Start the upload again from the file bytes.
    Reupload,
    /// Append this locator again; the content is already pinned.
    Reregister(ContentLocator),
    /// Issue the listing again.
    Requery,
    /// Fix configuration or session state before retrying.
    Reconfigure,
}

impl DriveError {
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Upload(_) => Recovery::Reupload,
            Self::Registration { locator, .. } => Recovery::Reregister(locator.clone()),
            Self::Retrieval(_) | Self::SessionReset => Recovery::Requery,
            Self::NoActiveAccount | Self::Config(_) | Self::Io(_) | Self::LockPoisoned => {
                Recovery::Reconfigure
            }
        }
    }

    /// The pinned-but-unregistered locator, if this is a registration failure.
    pub fn orphaned_locator(&self) -> Option<&ContentLocator> {
        match self {
            Self::Registration { locator, .. } => Some(locator),
            _ => None,
        }
    }
}

pub type DriveResult<T> = Result<T, DriveError>;
