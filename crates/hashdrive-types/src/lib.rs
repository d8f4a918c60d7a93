//! Foundation types for hashdrive.
//!
//! Every other hashdrive crate depends on `hashdrive-types`.
//!
//! # Key Types
//!
//! - [`Account`]: 20-byte wallet address that owns a file list
//! - [`ContentId`]: opaque identifier returned by a content-addressable store
//! - [`ContentLocator`]: `ipfs://<cid>[/<path>]` or an already-resolved HTTP(S) URL
//! - [`FileRecord`]: one locator registered under one account at one position

pub mod account;
pub mod error;
pub mod locator;
pub mod record;

pub use account::Account;
pub use error::TypeError;
pub use locator::{ContentId, ContentLocator, LocatorKind, SCHEME_PREFIX, STORAGE_SCHEME};
pub use record::FileRecord;
