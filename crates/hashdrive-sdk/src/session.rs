use std::collections::HashMap;

use hashdrive_catalog::DisplayEntry;
use hashdrive_types::{Account, ContentLocator};
use tracing::{info, warn};

/// Notifications from the wallet the session is attached to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The wallet switched accounts. `None` means it disconnected.
    AccountsChanged(Option<Account>),
    /// The wallet switched networks.
    ChainChanged { chain_id: u64 },
}

/// Pinned content whose ledger append failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Orphan {
    pub account: Account,
    pub locator: ContentLocator,
}

/// Client-side state tied to one connected account on one network.
///
/// Every [`SessionEvent`] is a full reset: cached listings and known orphans
/// are dropped and the generation counter advances. Work started under an
/// older generation must not write its results back.
#[derive(Debug, Default)]
pub struct Session {
    account: Option<Account>,
    chain_id: Option<u64>,
    generation: u64,
    listings: HashMap<Account, Vec<DisplayEntry>>,
    orphans: Vec<Orphan>,
}

impl Session {
    pub fn new(account: Option<Account>) -> Self {
        Self {
            account,
            ..Self::default()
        }
    }

    pub fn active_account(&self) -> Option<Account> {
        self.account
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::AccountsChanged(account) => {
                info!(from = ?self.account, to = ?account, "account changed");
                self.account = account;
            }
            SessionEvent::ChainChanged { chain_id } => {
                info!(from = ?self.chain_id, to = chain_id, "network changed");
                self.chain_id = Some(chain_id);
            }
        }
        self.reset();
    }

    fn reset(&mut self) {
        for orphan in self.orphans.drain(..) {
            warn!(account = %orphan.account, locator = %orphan.locator, "discarding unregistered content on session reset");
        }
        self.listings.clear();
        self.generation += 1;
    }

    /// Store a listing fetched under `generation`. Returns false, and stores
    /// nothing, if the session has been reset since.
    pub fn cache_listing(&mut self, generation: u64, account: Account, entries: Vec<DisplayEntry>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.listings.insert(account, entries);
        true
    }

    /// The last listing fetched for `account` in this generation.
    pub fn cached_listing(&self, account: &Account) -> Option<&[DisplayEntry]> {
        self.listings.get(account).map(Vec::as_slice)
    }

    /// Remember an orphan found under `generation`. Ignored if stale.
    pub fn record_orphan(&mut self, generation: u64, orphan: Orphan) -> bool {
        if generation != self.generation {
            warn!(account = %orphan.account, locator = %orphan.locator, "orphan from a previous session dropped");
            return false;
        }
        if !self.orphans.contains(&orphan) {
            self.orphans.push(orphan);
        }
        true
    }

    pub fn orphans_for(&self, account: &Account) -> Vec<ContentLocator> {
        self.orphans
            .iter()
            .filter(|o| &o.account == account)
            .map(|o| o.locator.clone())
            .collect()
    }

    pub fn resolve_orphan(&mut self, account: &Account, locator: &ContentLocator) {
        self.orphans
            .retain(|o| !(&o.account == account && &o.locator == locator));
    }

    /// Drop the cached listing for `account` so the next read goes to the ledger.
    pub fn invalidate_listing(&mut self, account: &Account) {
        self.listings.remove(account);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashdrive_catalog::FileType;

    fn account(seed: u8) -> Account {
        Account::from_bytes([seed; 20])
    }

    fn entry(locator: &str) -> DisplayEntry {
        DisplayEntry {
            locator: locator.into(),
            file_type: FileType::Other,
            resolved_url: locator.into(),
        }
    }

    fn orphan(seed: u8, cid: &str) -> Orphan {
        Orphan {
            account: account(seed),
            locator: ContentLocator::parse(&format!("ipfs://{cid}")).unwrap(),
        }
    }

    #[test]
    fn account_change_is_a_full_reset() {
        let mut session = Session::new(Some(account(1)));
        let g0 = session.generation();
        assert!(session.cache_listing(g0, account(1), vec![entry("ipfs://a")]));
        assert!(session.record_orphan(g0, orphan(1, "lost")));

        session.apply(SessionEvent::AccountsChanged(Some(account(2))));

        assert_eq!(session.active_account(), Some(account(2)));
        assert_eq!(session.generation(), g0 + 1);
        assert!(session.cached_listing(&account(1)).is_none());
        assert!(session.orphans_for(&account(1)).is_empty());
    }

    #[test]
    fn chain_change_resets_but_keeps_account() {
        let mut session = Session::new(Some(account(1)));
        session.cache_listing(0, account(1), vec![entry("ipfs://a")]);

        session.apply(SessionEvent::ChainChanged { chain_id: 5 });

        assert_eq!(session.active_account(), Some(account(1)));
        assert_eq!(session.chain_id(), Some(5));
        assert!(session.cached_listing(&account(1)).is_none());
    }

    #[test]
    fn stale_results_are_not_stored() {
        let mut session = Session::new(Some(account(1)));
        let started = session.generation();
        session.apply(SessionEvent::AccountsChanged(None));

        assert!(!session.cache_listing(started, account(1), vec![entry("ipfs://a")]));
        assert!(!session.record_orphan(started, orphan(1, "late")));
        assert!(session.cached_listing(&account(1)).is_none());
        assert!(session.active_account().is_none());
    }

    #[test]
    fn orphans_are_tracked_per_account() {
        let mut session = Session::new(Some(account(1)));
        session.record_orphan(0, orphan(1, "a"));
        session.record_orphan(0, orphan(1, "a"));
        session.record_orphan(0, orphan(2, "b"));

        assert_eq!(session.orphans_for(&account(1)).len(), 1);

        let first = orphan(1, "a");
        session.resolve_orphan(&first.account, &first.locator);
        assert!(session.orphans_for(&account(1)).is_empty());
        assert_eq!(session.orphans_for(&account(2)).len(), 1);
    }
}
