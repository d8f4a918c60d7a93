use std::sync::Arc;

use async_trait::async_trait;
use hashdrive_types::{Account, ContentLocator};

use crate::error::LedgerResult;

/// Whether an acknowledged append can already be read back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// `display` already includes the locator.
    Visible,
    /// Accepted, but readers may not see it yet.
    Pending,
}

/// Acknowledgment returned by [`RegistryLedger::add`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppendAck {
    pub account: Account,
    /// Zero-based position the locator will occupy in the account's sequence.
    pub position: u64,
    pub visibility: Visibility,
}

/// The account-addressed, append-only registry of content locators.
///
/// Implementations must satisfy these invariants:
/// - Appends for one account are linearizable; the sequence only grows.
/// - Entries are never removed or reordered.
/// - `display` returns an empty list for an account with no records.
/// - Reads may lag writes. Callers must not assume that a locator is
///   visible as soon as `add` returns.
#[async_trait]
pub trait RegistryLedger: Send + Sync {
    /// Append `locator` to `account`'s sequence.
    async fn add(&self, account: &Account, locator: &ContentLocator) -> LedgerResult<AppendAck>;

    /// Current sequence for `account`, oldest first.
    ///
    /// Entries are returned as the raw strings the ledger holds. A ledger
    /// shared with other writers may contain strings this crate would never
    /// have written, so callers parse them.
    async fn display(&self, account: &Account) -> LedgerResult<Vec<String>>;
}

#[async_trait]
impl<T: RegistryLedger + ?Sized> RegistryLedger for Arc<T> {
    async fn add(&self, account: &Account, locator: &ContentLocator) -> LedgerResult<AppendAck> {
        (**self).add(account, locator).await
    }

    async fn display(&self, account: &Account) -> LedgerResult<Vec<String>> {
        (**self).display(account).await
    }
}
