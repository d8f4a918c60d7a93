use hashdrive_ledger::LedgerError;
use hashdrive_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The ledger read itself failed.
    #[error("ledger read failed: {0}")]
    Ledger(#[from] LedgerError),

    /// The ledger returned an entry that is not a locator.
    #[error("malformed ledger entry at position {position}: {value:?}: {source}")]
    Malformed {
        position: usize,
        value: String,
        #[source]
        source: TypeError,
    },

    #[error("invalid gateway configuration: {0}")]
    Config(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
