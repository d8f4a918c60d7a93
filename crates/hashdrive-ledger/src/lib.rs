//! Append-only address registry for hashdrive.
//!
//! The registry maps an [`Account`](hashdrive_types::Account) to the ordered
//! list of content locators registered under it. This crate provides:
//! - The [`RegistryLedger`] trait boundary (`add` / `display`)
//! - [`InMemoryLedger`] for tests and embedding, with an optional
//!   deferred-visibility mode that models an eventually consistent ledger
//! - [`FileLedger`], a length + CRC framed append-only log on disk
//!
//! # Rules every backend follows
//!
//! 1. A locator appended under an account is never removed or reordered.
//! 2. An account's sequence length only grows.
//! 3. `display` on an unknown account returns an empty list, never an error.
//! 4. `add` acknowledges before the append is necessarily visible to readers.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{LedgerError, LedgerResult};
pub use file::{FileLedger, FileLedgerConfig, SyncMode};
pub use memory::InMemoryLedger;
pub use traits::{AppendAck, RegistryLedger, Visibility};
