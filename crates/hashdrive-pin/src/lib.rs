//! Content store client for hashdrive.
//!
//! Uploads raw bytes to a content-addressable pinning service and returns the
//! content identifier the service assigned. Backends implement
//! [`ContentStore`]:
//!
//! - [`PinataClient`]: multipart `POST` to a Pinata-compatible endpoint
//! - [`InMemoryContentStore`]: BLAKE3-addressed store for tests and offline use
//!
//! Uploads are never retried here. A failed upload is reported to the caller
//! and nothing downstream runs.

pub mod config;
pub mod error;
pub mod memory;
pub mod pinata;
pub mod traits;

pub use config::PinataConfig;
pub use error::{PinError, PinResult};
pub use memory::{InMemoryContentStore, PinnedObject};
pub use pinata::PinataClient;
pub use traits::ContentStore;
