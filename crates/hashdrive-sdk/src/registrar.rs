use std::sync::Arc;
use std::time::Duration;

use hashdrive_ledger::{AppendAck, LedgerError, RegistryLedger, Visibility};
use hashdrive_pin::ContentStore;
use hashdrive_types::{Account, ContentLocator, FileRecord};
use tracing::{debug, info, warn};

use crate::error::{DriveError, DriveResult};

/// Outcome of a successful registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub record: FileRecord,
    pub ack: AppendAck,
}

impl Registration {
    pub fn locator(&self) -> &ContentLocator {
        &self.record.locator
    }

    /// False while the ledger has accepted the append but readers may not
    /// see it yet.
    pub fn is_visible(&self) -> bool {
        self.ack.visibility == Visibility::Visible
    }
}

/// Runs the two-step "pin, then register" saga for one file.
///
/// There is no compensating action. If the ledger step fails the content
/// stays pinned and the error carries the locator so the append can be
/// retried with [`reregister`](Self::reregister).
pub struct Registrar {
    store: Arc<dyn ContentStore>,
    ledger: Arc<dyn RegistryLedger>,
    ledger_timeout: Duration,
}

impl Registrar {
    pub fn new(store: Arc<dyn ContentStore>, ledger: Arc<dyn RegistryLedger>) -> Self {
        Self {
            store,
            ledger,
            ledger_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_ledger_timeout(mut self, timeout: Duration) -> Self {
        self.ledger_timeout = timeout;
        self
    }

    pub fn ledger(&self) -> &Arc<dyn RegistryLedger> {
        &self.ledger
    }

    /// Pin `data` and append its locator to `account`'s sequence.
    pub async fn register(
        &self,
        account: &Account,
        data: Vec<u8>,
        filename: &str,
    ) -> DriveResult<Registration> {
        let size = data.len();
        let cid = self.store.upload(data, filename).await.map_err(|e| {
            warn!(%account, filename, error = %e, "upload failed; ledger untouched");
            DriveError::Upload(e)
        })?;

        let locator = ContentLocator::pinned(&cid);
        info!(%account, %cid, filename, size, "content pinned");
        self.reregister(account, locator).await
    }

    /// Append an already-pinned locator. Only the ledger step runs.
    pub async fn reregister(
        &self,
        account: &Account,
        locator: ContentLocator,
    ) -> DriveResult<Registration> {
        let millis = self.ledger_timeout.as_millis() as u64;
        let outcome = tokio::time::timeout(self.ledger_timeout, self.ledger.add(account, &locator))
            .await
            .unwrap_or(Err(LedgerError::Timeout { millis }));

        match outcome {
            Ok(ack) => {
                debug!(%account, %locator, position = ack.position, visibility = ?ack.visibility, "ledger ack");
                info!(%account, %locator, position = ack.position, "registered");
                Ok(Registration {
                    record: FileRecord::new(*account, locator, ack.position),
                    ack,
                })
            }
            Err(source) => {
                warn!(%account, %locator, error = %source, "registration failed; content orphaned");
                Err(DriveError::Registration { locator, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hashdrive_ledger::{InMemoryLedger, LedgerResult};
    use hashdrive_pin::{InMemoryContentStore, PinError, PinResult};
    use hashdrive_types::ContentId;

    struct FailingStore;

    #[async_trait]
    impl ContentStore for FailingStore {
        async fn upload(&self, _data: Vec<u8>, _filename: &str) -> PinResult<ContentId> {
            Err(PinError::Status {
                status: 500,
                body: "pinning unavailable".into(),
            })
        }
    }

    struct RejectingLedger;

    #[async_trait]
    impl RegistryLedger for RejectingLedger {
        async fn add(&self, _: &Account, _: &ContentLocator) -> LedgerResult<AppendAck> {
            Err(LedgerError::Rejected {
                reason: "out of gas".into(),
            })
        }

        async fn display(&self, _: &Account) -> LedgerResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    struct StalledLedger;

    #[async_trait]
    impl RegistryLedger for StalledLedger {
        async fn add(&self, _: &Account, _: &ContentLocator) -> LedgerResult<AppendAck> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(LedgerError::Unavailable("unreachable".into()))
        }

        async fn display(&self, _: &Account) -> LedgerResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn account() -> Account {
        Account::from_bytes([0xab; 20])
    }

    #[tokio::test]
    async fn register_pins_then_appends() {
        let store = Arc::new(InMemoryContentStore::new());
        let ledger = Arc::new(InMemoryLedger::new());
        let registrar = Registrar::new(store.clone(), ledger.clone());

        let reg = registrar
            .register(&account(), b"report".to_vec(), "report.pdf")
            .await
            .unwrap();

        let cid = InMemoryContentStore::content_id_for(b"report");
        assert_eq!(reg.locator().as_str(), format!("ipfs://{cid}"));
        assert_eq!(reg.record.position, 0);
        assert!(reg.is_visible());
        assert_eq!(store.pin_count().unwrap(), 1);
        assert_eq!(
            ledger.display(&account()).await.unwrap(),
            vec![reg.locator().to_string()]
        );
    }

    #[tokio::test]
    async fn upload_failure_leaves_ledger_untouched() {
        let ledger = Arc::new(InMemoryLedger::new());
        let registrar = Registrar::new(Arc::new(FailingStore), ledger.clone());

        let err = registrar
            .register(&account(), b"x".to_vec(), "x.png")
            .await
            .unwrap_err();

        assert!(matches!(err, DriveError::Upload(PinError::Status { status: 500, .. })));
        assert!(err.orphaned_locator().is_none());
        assert_eq!(ledger.len(&account()).unwrap(), 0);
        assert!(ledger.accounts().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ledger_failure_after_pin_is_registration_failure() {
        let store = Arc::new(InMemoryContentStore::new());
        let registrar = Registrar::new(store.clone(), Arc::new(RejectingLedger));

        let err = registrar
            .register(&account(), b"orphan".to_vec(), "orphan.txt")
            .await
            .unwrap_err();

        let cid = InMemoryContentStore::content_id_for(b"orphan");
        match &err {
            DriveError::Registration { locator, source } => {
                assert_eq!(locator.content_id(), Some(&cid));
                assert!(matches!(source, LedgerError::Rejected { .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
        // The content stays pinned.
        assert!(store.get(&cid).unwrap().is_some());
    }

    #[tokio::test]
    async fn reregister_skips_upload() {
        let ledger = Arc::new(InMemoryLedger::new());
        let registrar = Registrar::new(Arc::new(FailingStore), ledger.clone());
        let locator = ContentLocator::parse("ipfs://QmAlreadyPinned").unwrap();

        let reg = registrar.reregister(&account(), locator.clone()).await.unwrap();
        assert_eq!(reg.locator(), &locator);
        assert_eq!(ledger.len(&account()).unwrap(), 1);
    }

    #[tokio::test]
    async fn deferred_ledger_reports_pending() {
        let ledger = Arc::new(InMemoryLedger::deferred());
        let registrar = Registrar::new(Arc::new(InMemoryContentStore::new()), ledger.clone());

        let reg = registrar
            .register(&account(), b"slow".to_vec(), "slow.md")
            .await
            .unwrap();
        assert!(!reg.is_visible());
        assert!(ledger.display(&account()).await.unwrap().is_empty());

        ledger.settle().unwrap();
        assert_eq!(ledger.len(&account()).unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_ledger_times_out() {
        let registrar = Registrar::new(Arc::new(InMemoryContentStore::new()), Arc::new(StalledLedger))
            .with_ledger_timeout(Duration::from_millis(250));

        let err = registrar
            .register(&account(), b"x".to_vec(), "x.bin")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DriveError::Registration {
                source: LedgerError::Timeout { millis: 250 },
                ..
            }
        ));
    }
}
