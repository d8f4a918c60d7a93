use std::sync::Arc;

use async_trait::async_trait;
use hashdrive_types::ContentId;

use crate::error::PinResult;

/// A content-addressable store that pins uploaded bytes.
///
/// Once `upload` succeeds the content is durably pinned, whatever the caller
/// does next.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Pin `data` under `filename` and return its content identifier.
    async fn upload(&self, data: Vec<u8>, filename: &str) -> PinResult<ContentId>;
}

#[async_trait]
impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    async fn upload(&self, data: Vec<u8>, filename: &str) -> PinResult<ContentId> {
        (**self).upload(data, filename).await
    }
}
