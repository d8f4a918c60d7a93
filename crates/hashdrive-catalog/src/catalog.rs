use std::sync::Arc;

use hashdrive_ledger::RegistryLedger;
use hashdrive_types::{Account, ContentLocator};
use tracing::{debug, warn};

use crate::entry::DisplayEntry;
use crate::error::{CatalogError, CatalogResult};
use crate::gateway::Gateway;

/// Read side of the registry: ledger entries in, display entries out.
pub struct Catalog {
    ledger: Arc<dyn RegistryLedger>,
    gateway: Gateway,
}

impl Catalog {
    pub fn new(ledger: Arc<dyn RegistryLedger>, gateway: Gateway) -> Self {
        Self { ledger, gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// List everything registered under `account`, in registration order.
    ///
    /// No registrations is an empty listing. A ledger entry that does not
    /// parse as a locator fails the whole read, since the ledger returned
    /// data this reader cannot trust.
    pub async fn list(&self, account: &Account) -> CatalogResult<Vec<DisplayEntry>> {
        let raw = self.ledger.display(account).await?;
        debug!(%account, entries = raw.len(), "ledger read");

        raw.into_iter()
            .enumerate()
            .map(|(position, value)| match ContentLocator::parse(&value) {
                Ok(locator) => Ok(DisplayEntry::new(&locator, &self.gateway)),
                Err(source) => {
                    warn!(%account, position, value = %value, "malformed ledger entry");
                    Err(CatalogError::Malformed {
                        position,
                        value,
                        source,
                    })
                }
            })
            .collect()
    }

    /// Classify and resolve a single locator without touching the ledger.
    pub fn describe(&self, locator: &ContentLocator) -> DisplayEntry {
        DisplayEntry::new(locator, &self.gateway)
    }
}
