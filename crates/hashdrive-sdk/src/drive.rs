use std::sync::{Arc, RwLock};
use std::time::Duration;

use hashdrive_catalog::{Catalog, CatalogError, DisplayEntry, Gateway};
use hashdrive_ledger::{LedgerError, RegistryLedger};
use hashdrive_pin::ContentStore;
use hashdrive_types::{Account, ContentLocator};
use tracing::{debug, info, warn};

use crate::config::DriveConfig;
use crate::error::{DriveError, DriveResult};
use crate::registrar::{Registrar, Registration};
use crate::session::{Orphan, Session, SessionEvent};

/// Result of a [`Drive::reconcile`] pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub registered: Vec<Registration>,
    /// Orphans whose append failed again and are still tracked.
    pub remaining: Vec<ContentLocator>,
}

/// One wallet session's view of hashdrive.
pub struct Drive {
    registrar: Registrar,
    catalog: Catalog,
    session: RwLock<Session>,
    ledger_timeout: Duration,
}

impl Drive {
    pub fn new(store: Arc<dyn ContentStore>, ledger: Arc<dyn RegistryLedger>, gateway: Gateway) -> Self {
        let ledger_timeout = Duration::from_secs(30);
        Self {
            registrar: Registrar::new(store, ledger.clone()).with_ledger_timeout(ledger_timeout),
            catalog: Catalog::new(ledger, gateway),
            session: RwLock::new(Session::default()),
            ledger_timeout,
        }
    }

    /// Build a drive whose gateway and ledger timeout come from `config`.
    pub fn from_config(
        config: &DriveConfig,
        store: Arc<dyn ContentStore>,
        ledger: Arc<dyn RegistryLedger>,
    ) -> DriveResult<Self> {
        let gateway = Gateway::new(&config.gateway).map_err(|e| DriveError::Config(e.to_string()))?;
        Ok(Self::new(store, ledger, gateway).with_ledger_timeout(config.ledger_timeout()))
    }

    pub fn with_ledger_timeout(mut self, timeout: Duration) -> Self {
        self.registrar = self.registrar.with_ledger_timeout(timeout);
        self.ledger_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Connect `account`. Equivalent to an accounts-changed notification.
    pub fn connect(&self, account: Account) -> DriveResult<()> {
        self.on_event(SessionEvent::AccountsChanged(Some(account)))
    }

    pub fn on_event(&self, event: SessionEvent) -> DriveResult<()> {
        let mut session = self.session.write().map_err(|_| DriveError::LockPoisoned)?;
        session.apply(event);
        Ok(())
    }

    pub fn active_account(&self) -> DriveResult<Option<Account>> {
        let session = self.session.read().map_err(|_| DriveError::LockPoisoned)?;
        Ok(session.active_account())
    }

    pub fn generation(&self) -> DriveResult<u64> {
        let session = self.session.read().map_err(|_| DriveError::LockPoisoned)?;
        Ok(session.generation())
    }

    /// The active account and current generation, read together.
    fn snapshot(&self) -> DriveResult<(Option<Account>, u64)> {
        let session = self.session.read().map_err(|_| DriveError::LockPoisoned)?;
        Ok((session.active_account(), session.generation()))
    }

    /// Pin and register a file under the active account.
    ///
    /// A registration failure is also remembered as an orphan so that
    /// [`reconcile`](Self::reconcile) can retry it, unless the session was
    /// reset while the upload was running.
    pub async fn upload(&self, data: Vec<u8>, filename: &str) -> DriveResult<Registration> {
        let (account, generation) = self.snapshot()?;
        let account = account.ok_or(DriveError::NoActiveAccount)?;

        let result = self.registrar.register(&account, data, filename).await;
        self.settle_outcome(&account, generation, &result);
        result
    }

    /// Retry only the ledger append for content that is already pinned.
    pub async fn reregister(&self, locator: ContentLocator) -> DriveResult<Registration> {
        let (account, generation) = self.snapshot()?;
        let account = account.ok_or(DriveError::NoActiveAccount)?;

        let result = self.registrar.reregister(&account, locator).await;
        self.settle_outcome(&account, generation, &result);
        result
    }

    /// Record a registration outcome in the session. Bookkeeping failures are
    /// logged and never replace the outcome itself.
    fn settle_outcome(&self, account: &Account, generation: u64, result: &DriveResult<Registration>) {
        let Ok(mut session) = self.session.write() else {
            warn!(%account, outcome_ok = result.is_ok(), "session lock poisoned; registration outcome not recorded");
            return;
        };
        match result {
            Ok(registration) => {
                session.resolve_orphan(account, registration.locator());
                session.invalidate_listing(account);
            }
            Err(DriveError::Registration { locator, .. }) => {
                session.record_orphan(
                    generation,
                    Orphan {
                        account: *account,
                        locator: locator.clone(),
                    },
                );
            }
            Err(_) => {}
        }
    }

    /// Orphans recorded for the active account in this session.
    pub fn orphans(&self) -> DriveResult<Vec<ContentLocator>> {
        let session = self.session.read().map_err(|_| DriveError::LockPoisoned)?;
        Ok(session
            .active_account()
            .map(|a| session.orphans_for(&a))
            .unwrap_or_default())
    }

    /// Re-attempt registration of every known orphan for the active account.
    ///
    /// The account is fixed when the pass starts. If the session is reset
    /// part way through, the pass stops before the next append and returns
    /// [`DriveError::SessionReset`].
    pub async fn reconcile(&self) -> DriveResult<ReconcileReport> {
        let (account, generation, pending) = {
            let session = self.session.read().map_err(|_| DriveError::LockPoisoned)?;
            let account = session.active_account().ok_or(DriveError::NoActiveAccount)?;
            (account, session.generation(), session.orphans_for(&account))
        };

        let mut report = ReconcileReport::default();
        if pending.is_empty() {
            return Ok(report);
        }
        info!(%account, orphans = pending.len(), "reconciling unregistered content");

        for locator in pending {
            if self.generation()? != generation {
                warn!(%account, registered = report.registered.len(), "reconciliation stopped after session reset");
                return Err(DriveError::SessionReset);
            }

            let result = self.registrar.reregister(&account, locator).await;
            self.settle_outcome(&account, generation, &result);
            match result {
                Ok(registration) => report.registered.push(registration),
                Err(DriveError::Registration { locator, source }) => {
                    debug!(%locator, error = %source, "orphan still unregistered");
                    report.remaining.push(locator);
                }
                Err(other) => return Err(other),
            }
        }
        Ok(report)
    }

    /// List the files registered under `account`, or under the active
    /// account when `account` is `None`.
    ///
    /// Always reads the ledger. A listing that completes after an account or
    /// network change is discarded with [`DriveError::SessionReset`].
    pub async fn files(&self, account: Option<&Account>) -> DriveResult<Vec<DisplayEntry>> {
        let (active, generation) = self.snapshot()?;
        let target = account
            .copied()
            .or(active)
            .ok_or(DriveError::NoActiveAccount)?;

        let millis = self.ledger_timeout.as_millis() as u64;
        let entries = tokio::time::timeout(self.ledger_timeout, self.catalog.list(&target))
            .await
            .unwrap_or(Err(CatalogError::Ledger(LedgerError::Timeout { millis })))?;

        let mut session = self.session.write().map_err(|_| DriveError::LockPoisoned)?;
        if !session.cache_listing(generation, target, entries.clone()) {
            warn!(account = %target, started = generation, current = session.generation(), "listing discarded after session reset");
            return Err(DriveError::SessionReset);
        }
        debug!(account = %target, entries = entries.len(), "listing complete");
        Ok(entries)
    }

    /// The last listing fetched for `account` in this session, if any.
    pub fn cached_files(&self, account: &Account) -> DriveResult<Option<Vec<DisplayEntry>>> {
        let session = self.session.read().map_err(|_| DriveError::LockPoisoned)?;
        Ok(session.cached_listing(account).map(<[DisplayEntry]>::to_vec))
    }
}
