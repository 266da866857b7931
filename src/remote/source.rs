//! Paged asset source
//!
//! Drains a repository's flat asset listing page by page, following the
//! continuation token until the remote stops returning one. Item order is
//! whatever the remote returns and carries no meaning.

use super::AssetTransport;
use crate::error::NexusError;
use crate::types::{AssetDescriptor, Checksum};
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Default bound on pages per listing pass
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Default number of in-flight detail lookups during enrichment
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 4;

#[derive(Clone)]
pub struct PagedAssetSource {
    transport: Arc<dyn AssetTransport>,
    max_pages: usize,
    fetch_details: bool,
    detail_concurrency: usize,
}

impl PagedAssetSource {
    pub fn new(transport: Arc<dyn AssetTransport>) -> Self {
        Self {
            transport,
            max_pages: DEFAULT_MAX_PAGES,
            fetch_details: true,
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Enrich every listed asset with the detail call and a size probe.
    pub fn with_details(mut self, fetch_details: bool) -> Self {
        self.fetch_details = fetch_details;
        self
    }

    pub fn with_detail_concurrency(mut self, concurrency: usize) -> Self {
        self.detail_concurrency = concurrency.max(1);
        self
    }

    pub fn transport(&self) -> &Arc<dyn AssetTransport> {
        &self.transport
    }

    /// Lazily list every asset of `repository`.
    ///
    /// The first error ends the stream; pagination that never terminates is
    /// reported as [`NexusError::Protocol`].
    pub fn fetch_all(
        &self,
        repository: &str,
    ) -> BoxStream<'static, Result<AssetDescriptor, NexusError>> {
        let assets = self
            .pages(repository)
            .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
            .try_flatten();

        if !self.fetch_details {
            return assets.boxed();
        }

        let transport = self.transport.clone();
        assets
            .map_ok(move |asset| enrich(transport.clone(), asset))
            .try_buffered(self.detail_concurrency)
            .boxed()
    }

    fn pages(
        &self,
        repository: &str,
    ) -> impl Stream<Item = Result<Vec<AssetDescriptor>, NexusError>> + Send + 'static {
        let transport = self.transport.clone();
        let repository = repository.to_string();
        let max_pages = self.max_pages;

        stream::try_unfold(PageCursor::default(), move |mut cursor| {
            let transport = transport.clone();
            let repository = repository.clone();
            async move {
                if cursor.finished {
                    return Ok(None);
                }
                if cursor.pages >= max_pages {
                    return Err(NexusError::Protocol(format!(
                        "listing of {} did not finish within {} pages",
                        repository, max_pages
                    )));
                }
                let page = transport
                    .paged_query(&repository, cursor.token.as_deref())
                    .await?;
                cursor.pages += 1;
                cursor.advance(page.continuation_token)?;
                if let Some(token) = &cursor.token {
                    debug!(repository = %repository, page = cursor.pages, "Continuing with {}", token);
                }
                Ok(Some((page.items, cursor)))
            }
        })
    }
}

/// Pagination state for one listing pass
#[derive(Debug, Default)]
struct PageCursor {
    token: Option<String>,
    seen: HashSet<String>,
    pages: usize,
    finished: bool,
}

impl PageCursor {
    fn advance(&mut self, next: Option<String>) -> Result<(), NexusError> {
        let Some(token) = next else {
            self.finished = true;
            return Ok(());
        };
        if self.token.as_deref() == Some(token.as_str()) {
            return Err(NexusError::Protocol(format!(
                "remote repeated continuation token {}",
                token
            )));
        }
        if !self.seen.insert(token.clone()) {
            return Err(NexusError::Protocol(format!(
                "continuation token {} was already visited",
                token
            )));
        }
        self.token = Some(token);
        Ok(())
    }
}

async fn enrich(
    transport: Arc<dyn AssetTransport>,
    mut asset: AssetDescriptor,
) -> Result<AssetDescriptor, NexusError> {
    let detail = transport.asset_detail(&asset.id).await?;
    if !detail.download_url.is_empty() {
        asset.download_url = detail.download_url;
    }
    if detail.checksum != Checksum::default() {
        asset.checksum = detail.checksum;
    }
    asset.last_modified = detail.last_modified.or(asset.last_modified);
    if !asset.download_url.is_empty() {
        asset.size = transport.content_length(&asset.download_url).await?;
    }
    Ok(asset)
}
