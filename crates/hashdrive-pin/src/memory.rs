use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use hashdrive_types::ContentId;
use tracing::debug;

use crate::error::{PinError, PinResult};
use crate::traits::ContentStore;

/// A pinned object held by [`InMemoryContentStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinnedObject {
    pub filename: String,
    pub data: Vec<u8>,
}

/// `HashMap`-backed content store for tests and offline use.
///
/// Identifiers are `b3` followed by the hex BLAKE3 digest of the bytes, so
/// identical content always maps to the same identifier. Uploading the same
/// bytes twice keeps the first filename.
#[derive(Default)]
pub struct InMemoryContentStore {
    pins: RwLock<HashMap<ContentId, PinnedObject>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The identifier `upload` assigns to `data`.
    pub fn content_id_for(data: &[u8]) -> ContentId {
        ContentId::new(format!("b3{}", blake3::hash(data).to_hex()))
            .unwrap_or_else(|_| unreachable!("hex digest is always a valid content id"))
    }

    pub fn get(&self, cid: &ContentId) -> PinResult<Option<PinnedObject>> {
        let pins = self.pins.read().map_err(|_| PinError::LockPoisoned)?;
        Ok(pins.get(cid).cloned())
    }

    pub fn pin_count(&self) -> PinResult<usize> {
        let pins = self.pins.read().map_err(|_| PinError::LockPoisoned)?;
        Ok(pins.len())
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn upload(&self, data: Vec<u8>, filename: &str) -> PinResult<ContentId> {
        let cid = Self::content_id_for(&data);
        let mut pins = self.pins.write().map_err(|_| PinError::LockPoisoned)?;
        pins.entry(cid.clone()).or_insert_with(|| PinnedObject {
            filename: filename.to_string(),
            data,
        });
        debug!(%cid, filename, "pinned in memory");
        Ok(cid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_is_content_addressed() {
        let store = InMemoryContentStore::new();
        let a = store.upload(b"same".to_vec(), "a.txt").await.unwrap();
        let b = store.upload(b"same".to_vec(), "b.txt").await.unwrap();
        let c = store.upload(b"different".to_vec(), "c.txt").await.unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.pin_count().unwrap(), 2);
        assert_eq!(store.get(&a).unwrap().unwrap().filename, "a.txt");
    }

    #[tokio::test]
    async fn stored_bytes_are_retrievable() {
        let store = InMemoryContentStore::new();
        let cid = store.upload(vec![1, 2, 3], "raw.bin").await.unwrap();
        assert_eq!(store.get(&cid).unwrap().unwrap().data, vec![1, 2, 3]);
    }

    #[test]
    fn content_id_shape() {
        let cid = InMemoryContentStore::content_id_for(b"");
        assert!(cid.as_str().starts_with("b3"));
        assert_eq!(cid.as_str().len(), 2 + 64);
    }
}
