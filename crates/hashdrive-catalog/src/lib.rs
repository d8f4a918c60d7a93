//! Retrieval and classification for hashdrive.
//!
//! Turns the raw strings a registry ledger holds for an address into
//! displayable entries:
//!
//! 1. [`Catalog::list`] reads the account's sequence and parses each entry.
//! 2. [`classify`] picks a [`FileType`] from the locator's extension.
//! 3. [`Gateway::resolve`] maps `ipfs://` locators to a fetchable URL.
//! 4. [`render_previews`] swaps entries that fail to load for a placeholder.
//!
//! Classification and resolution look only at the locator string. No content
//! is fetched to decide either.

pub mod catalog;
pub mod classify;
pub mod entry;
pub mod error;
pub mod gateway;
pub mod preview;

pub use catalog::Catalog;
pub use classify::{classify, FileType};
pub use entry::DisplayEntry;
pub use error::{CatalogError, CatalogResult};
pub use gateway::{Gateway, GatewayConfig, DEFAULT_GATEWAY};
pub use preview::{render_previews, Preview};
