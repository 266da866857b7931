//! In-memory transport
//!
//! Scripted stand-in for the repository manager: serves paged listings from a
//! map of repositories, records call counts, and can inject failures, latency
//! and a stuck continuation token.

use super::AssetTransport;
use crate::error::{NexusError, RemoteError};
use crate::path;
use crate::types::{AssetDescriptor, AssetDetail, AssetPage, Checksum, UploadRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// Call counters, one per transport operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub paged_queries: usize,
    pub asset_details: usize,
    pub content_lengths: usize,
    pub uploads: usize,
}

#[derive(Debug, Clone)]
struct StoredAsset {
    descriptor: AssetDescriptor,
    /// None when size probes get no length back
    size: Option<u64>,
    last_modified: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    repositories: BTreeMap<String, Vec<StoredAsset>>,
    stats: MemoryStats,
    query_failures: VecDeque<NexusError>,
    upload_failures: VecDeque<NexusError>,
    stuck_token: Option<String>,
}

pub struct MemoryTransport {
    state: Mutex<MemoryState>,
    page_size: usize,
    latency: Option<Duration>,
}

impl MemoryTransport {
    pub fn new(page_size: usize) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            page_size: page_size.max(1),
            latency: None,
        }
    }

    /// Delay every paged query, so concurrent callers overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add an asset of `size` bytes; repeated paths are stored again, like a
    /// remote listing that reports duplicates.
    pub fn insert(&self, repository: &str, asset_path: &str, size: u64) -> AssetDescriptor {
        let repository = path::normalize(repository);
        let asset_path = path::normalize(asset_path);
        let mut state = self.state.lock();
        let stored = state.repositories.entry(repository.clone()).or_default();
        let descriptor = AssetDescriptor {
            id: format!("{}:{}:{}", repository, asset_path, stored.len()),
            repository: repository.clone(),
            path: asset_path.clone(),
            checksum: Checksum {
                md5: format!("md5-{}", asset_path),
                sha1: format!("sha1-{}", asset_path),
            },
            size: None,
            last_modified: None,
            download_url: format!("memory://{}/{}", repository, asset_path),
        };
        stored.push(StoredAsset {
            descriptor: descriptor.clone(),
            size: Some(size),
            last_modified: Utc::now(),
        });
        descriptor
    }

    /// Register a repository with no assets.
    pub fn create_repository(&self, repository: &str) {
        self.state
            .lock()
            .repositories
            .entry(path::normalize(repository))
            .or_default();
    }

    /// Answer size probes for this asset without a length, like a chunked
    /// or proxied download.
    pub fn hide_content_length(&self, repository: &str, asset_path: &str) {
        let asset_path = path::normalize(asset_path);
        let mut state = self.state.lock();
        if let Some(stored) = state.repositories.get_mut(&path::normalize(repository)) {
            stored
                .iter_mut()
                .filter(|s| s.descriptor.path == asset_path)
                .for_each(|s| s.size = None);
        }
    }

    /// Make the next paged query fail with `error`.
    pub fn fail_next_query(&self, error: NexusError) {
        self.state.lock().query_failures.push_back(error);
    }

    /// Make the next upload fail with `error`.
    pub fn fail_next_upload(&self, error: NexusError) {
        self.state.lock().upload_failures.push_back(error);
    }

    /// Answer every page with the same continuation token.
    pub fn stick_continuation_token(&self, token: &str) {
        self.state.lock().stuck_token = Some(token.to_string());
    }

    pub fn stats(&self) -> MemoryStats {
        self.state.lock().stats.clone()
    }

    fn parse_offset(repository: &str, token: Option<&str>) -> Result<usize, NexusError> {
        let Some(token) = token else {
            return Ok(0);
        };
        token
            .strip_prefix(repository)
            .and_then(|rest| rest.strip_prefix('@'))
            .and_then(|offset| offset.parse().ok())
            .ok_or_else(|| {
                NexusError::Remote(RemoteError::new(
                    400,
                    "invalid_token",
                    format!("Invalid continuation token {}", token),
                ))
            })
    }

    fn find<'a>(
        state: &'a MemoryState,
        matches: impl Fn(&AssetDescriptor) -> bool,
    ) -> Option<&'a StoredAsset> {
        state
            .repositories
            .values()
            .flatten()
            .find(|stored| matches(&stored.descriptor))
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new(10)
    }
}

fn not_found(what: &str) -> NexusError {
    NexusError::Remote(RemoteError::new(404, "not_found", format!("{} not found", what)))
}

#[async_trait]
impl AssetTransport for MemoryTransport {
    async fn paged_query(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> Result<AssetPage, NexusError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut state = self.state.lock();
        state.stats.paged_queries += 1;
        if let Some(error) = state.query_failures.pop_front() {
            return Err(error);
        }
        let stored = state
            .repositories
            .get(repository)
            .ok_or_else(|| not_found(&format!("Repository {}", repository)))?;

        if let Some(token) = state.stuck_token.clone() {
            let items = stored
                .iter()
                .take(self.page_size)
                .map(|s| s.descriptor.clone())
                .collect();
            return Ok(AssetPage {
                items,
                continuation_token: Some(token),
            });
        }

        let offset = Self::parse_offset(repository, continuation_token)?;
        let end = (offset + self.page_size).min(stored.len());
        let items = stored
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|s| s.descriptor.clone())
            .collect();
        let continuation_token = (end < stored.len()).then(|| format!("{}@{}", repository, end));
        Ok(AssetPage {
            items,
            continuation_token,
        })
    }

    async fn asset_detail(&self, asset_id: &str) -> Result<AssetDetail, NexusError> {
        let mut state = self.state.lock();
        state.stats.asset_details += 1;
        let stored = Self::find(&state, |d| d.id == asset_id)
            .ok_or_else(|| not_found(&format!("Asset {}", asset_id)))?;
        Ok(AssetDetail {
            last_modified: Some(stored.last_modified),
            checksum: stored.descriptor.checksum.clone(),
            download_url: stored.descriptor.download_url.clone(),
        })
    }

    async fn content_length(&self, download_url: &str) -> Result<Option<u64>, NexusError> {
        let mut state = self.state.lock();
        state.stats.content_lengths += 1;
        Self::find(&state, |d| d.download_url == download_url)
            .map(|stored| stored.size)
            .ok_or_else(|| not_found(download_url))
    }

    async fn upload(
        &self,
        repository: &str,
        asset_path: &str,
        request: UploadRequest,
    ) -> Result<(), NexusError> {
        {
            let mut state = self.state.lock();
            state.stats.uploads += 1;
            if let Some(error) = state.upload_failures.pop_front() {
                return Err(error);
            }
        }
        let size = request.size.unwrap_or(request.content.len() as u64);
        self.insert(repository, asset_path, size);
        Ok(())
    }
}
