//! Listing View
//!
//! The filesystem handle. Every caller path is joined to the handle's root and
//! split into a repository and a repository-relative path. The repository's
//! tree is materialized on first access and reused until a write invalidates
//! it; per repository the lifecycle is Empty -> Materializing -> Materialized,
//! back to Empty on invalidation or on a failed pass.

mod entry;

pub use entry::{DirEntry, DirectoryEntry, ObjectEntry};

use crate::concurrency::{RepositorySlots, SlotState};
use crate::config::NexusConfig;
use crate::error::NexusError;
use crate::path;
use crate::remote::{AssetTransport, HttpTransport, PagedAssetSource, RetryingTransport};
use crate::tree::{TreeCache, TreeMaterializer, TreeNode};
use crate::types::{CacheKey, HashType, UploadRequest};
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Filesystem view over one repository manager, rooted at `repository[/path]`
pub struct NexusFs {
    root: String,
    repository: String,
    path: String,
    source: PagedAssetSource,
    slots: RepositorySlots,
    passes: AtomicUsize,
}

impl NexusFs {
    pub fn new(root: &str, source: PagedAssetSource) -> Self {
        let root = path::normalize(root);
        let (repository, path) = path::split_repository(&root);
        debug!(root = %root, repository = %repository, "Creating filesystem view");
        Self {
            root,
            repository,
            path,
            source,
            slots: RepositorySlots::new(),
            passes: AtomicUsize::new(0),
        }
    }

    /// Build a view backed by the HTTP transport with retries, as configured.
    pub fn from_config(root: &str, config: &NexusConfig) -> Result<Self, NexusError> {
        config.validate().map_err(NexusError::Config)?;
        let http = HttpTransport::new(
            &config.endpoint,
            &config.username,
            &config.password,
            config.timeout(),
        )?;
        debug!(username = %config.username, endpoint = %config.endpoint, "Using endpoint");
        let transport: Arc<dyn AssetTransport> =
            Arc::new(RetryingTransport::new(http, config.retry.policy()));
        let source = PagedAssetSource::new(transport)
            .with_max_pages(config.listing.max_pages)
            .with_details(config.listing.fetch_details)
            .with_detail_concurrency(config.listing.detail_concurrency);
        Ok(Self::new(root, source))
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Modification time precision
    pub fn precision(&self) -> Duration {
        Duration::from_millis(1)
    }

    pub fn hashes(&self) -> &'static [HashType] {
        &HashType::SUPPORTED
    }

    /// Number of materialization passes started so far
    pub fn materializations(&self) -> usize {
        self.passes.load(Ordering::SeqCst)
    }

    /// Split a root-relative path into (repository, repository-relative path).
    pub fn split(&self, relative: &str) -> (String, String) {
        path::split_repository(&path::join(&self.root, relative))
    }

    fn locate(&self, relative: &str) -> Result<(String, CacheKey), NexusError> {
        let (repository, inner) = self.split(relative);
        if repository.is_empty() {
            return Err(NexusError::InvalidPath(format!(
                "{:?} does not name a repository",
                relative
            )));
        }
        let key = CacheKey::for_asset(&repository, &inner);
        Ok((repository, key))
    }

    fn relative(&self, key: &CacheKey) -> String {
        path::rebase(key.as_str(), &self.root).unwrap_or_else(|| key.to_string())
    }

    /// Materialized tree of a repository, building it at most once per cache lifetime.
    ///
    /// Concurrent callers wait on the repository's slot and share the pass that
    /// holds it. A failed pass leaves the slot empty.
    pub async fn tree(&self, repository: &str) -> Result<Arc<TreeCache>, NexusError> {
        let slot = self.slots.get(repository);
        let mut state = slot.lock().await;
        if let Some(cache) = state.cache() {
            return Ok(cache);
        }

        self.passes.fetch_add(1, Ordering::SeqCst);
        debug!(repository, "Materializing repository tree");
        let cache = Arc::new(TreeMaterializer::materialize(&self.source, repository).await?);
        *state = SlotState::Materialized(cache.clone());
        Ok(cache)
    }

    /// Drop the cached tree of a repository; the next listing re-materializes it.
    pub async fn invalidate(&self, repository: &str) {
        if let Some(slot) = self.slots.existing(repository) {
            *slot.lock().await = SlotState::Empty;
            debug!(repository, "Invalidated repository tree");
        }
    }

    /// List a directory. Non-recursive listings return the immediate children;
    /// recursive listings return every file below the directory.
    pub async fn list(&self, dir: &str, recursive: bool) -> Result<Vec<DirEntry>, NexusError> {
        let (repository, key) = self.locate(dir)?;
        let cache = self.tree(&repository).await?;

        if recursive {
            let files = cache.files_under(&key)?;
            return Ok(files
                .into_iter()
                .map(|file| {
                    DirEntry::Object(ObjectEntry::from_node(self.relative(&file.key), file))
                })
                .collect());
        }

        let entries = cache
            .children(&key)?
            .into_iter()
            .map(|node| match node {
                TreeNode::Directory(sub) => {
                    DirEntry::Directory(DirectoryEntry::from_node(self.relative(&sub.key), sub))
                }
                TreeNode::File(file) => {
                    DirEntry::Object(ObjectEntry::from_node(self.relative(&file.key), file))
                }
            })
            .collect();
        Ok(entries)
    }

    /// Look up a single object.
    pub async fn get_object(&self, remote: &str) -> Result<ObjectEntry, NexusError> {
        let (repository, key) = self.locate(remote)?;
        let cache = self.tree(&repository).await?;
        cache
            .get_file(&key)
            .map(|file| ObjectEntry::from_node(self.relative(&file.key), file))
            .ok_or_else(|| NexusError::NotFound(format!("object not found: {}", remote)))
    }

    /// Upload an object and invalidate its repository's tree.
    pub async fn put(
        &self,
        remote: &str,
        request: UploadRequest,
    ) -> Result<ObjectEntry, NexusError> {
        let (repository, key) = self.locate(remote)?;
        let inner = path::rebase(key.as_str(), &repository).unwrap_or_default();
        if inner.is_empty() {
            return Err(NexusError::InvalidPath(format!(
                "{:?} names a repository, not an object",
                remote
            )));
        }

        let size = request.size.unwrap_or(request.content.len() as u64);
        self.source
            .transport()
            .upload(&repository, &inner, request)
            .await?;
        self.invalidate(&repository).await;
        info!(repository = %repository, path = %inner, size, "Uploaded object");

        Ok(ObjectEntry {
            path: self.relative(&key),
            size,
            checksum: Default::default(),
            mod_time: Utc::now(),
        })
    }

    /// Accepted without effect: the remote has no directory primitive.
    pub async fn mkdir(&self, dir: &str) -> Result<(), NexusError> {
        debug!(dir, "mkdir is a no-op");
        Ok(())
    }

    /// Accepted without effect: directories exist only through their assets.
    pub async fn rmdir(&self, dir: &str) -> Result<(), NexusError> {
        debug!(dir, "rmdir is a no-op");
        Ok(())
    }
}
