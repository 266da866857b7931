//! Remote collaborators
//!
//! The repository manager is reached through [`AssetTransport`]. The listing
//! core only depends on this trait; the reqwest client, the retry decorator and
//! the in-memory transport are interchangeable implementations.

pub mod http;
pub mod memory;
pub mod retry;
pub mod source;
pub mod wire;

use crate::error::NexusError;
use crate::types::{AssetDetail, AssetPage, UploadRequest};
use async_trait::async_trait;

pub use http::HttpTransport;
pub use memory::MemoryTransport;
pub use retry::{RetryPolicy, RetryingTransport};
pub use source::PagedAssetSource;

/// Transport contract consumed by the asset source and the listing view.
#[async_trait]
pub trait AssetTransport: Send + Sync {
    /// Fetch one page of a repository's flat asset listing.
    async fn paged_query(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> Result<AssetPage, NexusError>;

    /// Fetch modification time, checksums and download locator of one asset.
    async fn asset_detail(&self, asset_id: &str) -> Result<AssetDetail, NexusError>;

    /// Probe the size of an asset with a header-only request. `None` when the
    /// remote does not report a length.
    async fn content_length(&self, download_url: &str) -> Result<Option<u64>, NexusError>;

    /// Store `request.content` at `path` inside `repository`.
    async fn upload(
        &self,
        repository: &str,
        path: &str,
        request: UploadRequest,
    ) -> Result<(), NexusError>;
}
