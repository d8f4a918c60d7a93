use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use hashdrive_types::{Account, ContentLocator};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::traits::{AppendAck, RegistryLedger, Visibility};

/// In-memory registry for tests, local demos, and embedding.
///
/// In the default mode every append is visible immediately. A ledger built
/// with [`InMemoryLedger::deferred`] instead queues appends until
/// [`settle`](InMemoryLedger::settle) is called, which is how a remote
/// ledger behaves between submission and confirmation.
pub struct InMemoryLedger {
    deferred: bool,
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    streams: HashMap<Account, Vec<String>>,
    pending: Vec<(Account, String)>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            deferred: false,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// A ledger whose appends stay invisible until [`settle`](Self::settle).
    pub fn deferred() -> Self {
        Self {
            deferred: true,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// Make every pending append visible, in submission order.
    ///
    /// Returns the number of appends applied.
    pub fn settle(&self) -> LedgerResult<usize> {
        let mut state = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;
        let pending = std::mem::take(&mut state.pending);
        let applied = pending.len();
        for (account, locator) in pending {
            state.streams.entry(account).or_default().push(locator);
        }
        if applied > 0 {
            debug!(applied, "settled pending appends");
        }
        Ok(applied)
    }

    /// Number of appends accepted but not yet visible.
    pub fn pending_count(&self) -> LedgerResult<usize> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.pending.len())
    }

    /// Visible sequence length for `account`.
    pub fn len(&self, account: &Account) -> LedgerResult<u64> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.streams.get(account).map(|s| s.len() as u64).unwrap_or(0))
    }

    /// All accounts with at least one visible entry, sorted.
    pub fn accounts(&self) -> LedgerResult<Vec<Account>> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        let mut accounts: Vec<_> = state.streams.keys().copied().collect();
        accounts.sort();
        Ok(accounts)
    }

    /// Append an unvalidated string, as another writer sharing the ledger could.
    pub fn append_raw(&self, account: &Account, entry: impl Into<String>) -> LedgerResult<u64> {
        let mut state = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;
        let stream = state.streams.entry(*account).or_default();
        stream.push(entry.into());
        Ok((stream.len() - 1) as u64)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryLedger for InMemoryLedger {
    async fn add(&self, account: &Account, locator: &ContentLocator) -> LedgerResult<AppendAck> {
        let mut state = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;

        let visible = state.streams.get(account).map(Vec::len).unwrap_or(0);

        if self.deferred {
            let queued = state.pending.iter().filter(|(a, _)| a == account).count();
            state.pending.push((*account, locator.to_string()));
            debug!(%account, %locator, position = visible + queued, "append queued");
            return Ok(AppendAck {
                account: *account,
                position: (visible + queued) as u64,
                visibility: Visibility::Pending,
            });
        }

        state
            .streams
            .entry(*account)
            .or_default()
            .push(locator.to_string());
        debug!(%account, %locator, position = visible, "append applied");

        Ok(AppendAck {
            account: *account,
            position: visible as u64,
            visibility: Visibility::Visible,
        })
    }

    async fn display(&self, account: &Account) -> LedgerResult<Vec<String>> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(state.streams.get(account).cloned().unwrap_or_default())
    }
}
