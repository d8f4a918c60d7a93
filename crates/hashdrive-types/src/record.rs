use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::locator::ContentLocator;

/// One locator registered under one account.
///
/// `position` is the zero-based insertion index within the account's
/// sequence. Insertion order is the only ordering signal; there is no
/// timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub account: Account,
    pub locator: ContentLocator,
    pub position: u64,
}

impl FileRecord {
    pub fn new(account: Account, locator: ContentLocator, position: u64) -> Self {
        Self {
            account,
            locator,
            position,
        }
    }
}
