//! High-level API for hashdrive.
//!
//! [`Drive`] is the entry point for applications: it owns the session state
//! for one connected wallet and exposes uploads, listings, re-registration of
//! orphaned content, and the reset rules for account and network changes.
//! [`Registrar`] is the pin-then-register saga on its own, for callers that
//! manage accounts themselves.

pub mod config;
pub mod drive;
pub mod error;
pub mod registrar;
pub mod session;

pub use config::{DriveConfig, LedgerConfig};
pub use drive::{Drive, ReconcileReport};
pub use error::{DriveError, DriveResult, Recovery};
pub use registrar::{Registrar, Registration};
pub use session::{Orphan, Session, SessionEvent};

// Re-export key types
pub use hashdrive_catalog::{DisplayEntry, FileType, Gateway, GatewayConfig, Preview};
pub use hashdrive_ledger::{AppendAck, RegistryLedger, Visibility};
pub use hashdrive_pin::{ContentStore, PinataConfig};
pub use hashdrive_types::{Account, ContentId, ContentLocator, FileRecord};
