//! Tree materialization
//!
//! Builds a repository's implied directory hierarchy from its flat asset
//! listing, one asset at a time and in any arrival order. For each asset the
//! file node is stored, then its ancestors are walked upward: missing
//! directories are created and every directory-child edge is recorded. The
//! walk stops after linking into a directory that already existed, since that
//! directory's own chain to the root was linked when it was created.

use super::cache::TreeCache;
use super::node::{DirectoryNode, FileNode, TreeNode};
use crate::error::NexusError;
use crate::remote::PagedAssetSource;
use crate::types::{AssetDescriptor, CacheKey};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use tracing::{debug, info, warn};

/// Counters for one materialization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    pub assets: usize,
    pub files: usize,
    pub skipped: usize,
}

pub struct TreeMaterializer {
    cache: TreeCache,
    stats: MaterializeStats,
}

impl TreeMaterializer {
    /// Start a pass; `built_at` becomes the modification time of every synthesized directory.
    pub fn new(repository: &str, built_at: DateTime<Utc>) -> Self {
        Self {
            cache: TreeCache::new(repository, built_at),
            stats: MaterializeStats::default(),
        }
    }

    /// Drain the asset source for `repository` and build its tree.
    ///
    /// On error nothing is returned; the partially built cache is dropped.
    pub async fn materialize(
        source: &PagedAssetSource,
        repository: &str,
    ) -> Result<TreeCache, NexusError> {
        let mut materializer = TreeMaterializer::new(repository, Utc::now());
        let mut assets = source.fetch_all(repository);
        while let Some(asset) = assets.try_next().await? {
            materializer.ingest(asset);
        }
        let stats = materializer.stats();
        let cache = materializer.finish();
        info!(
            repository = cache.repository(),
            assets = stats.assets,
            files = stats.files,
            skipped = stats.skipped,
            nodes = cache.len(),
            "Materialized repository tree"
        );
        Ok(cache)
    }

    pub fn stats(&self) -> MaterializeStats {
        self.stats
    }

    pub fn finish(self) -> TreeCache {
        self.cache
    }

    /// Add one asset to the tree.
    pub fn ingest(&mut self, asset: AssetDescriptor) {
        self.stats.assets += 1;
        let key = CacheKey::for_asset(self.cache.repository(), &asset.path);
        if key == *self.cache.root() {
            warn!(asset = %asset.id, "Skipping asset with empty path");
            self.stats.skipped += 1;
            return;
        }

        match self.cache.get(&key) {
            Some(TreeNode::Directory(_)) => {
                warn!(path = %key, "Asset path is also a directory; keeping the directory");
                self.stats.skipped += 1;
                return;
            }
            Some(TreeNode::File(existing)) if existing.asset_id >= asset.id => {
                debug!(path = %key, asset = %asset.id, "Duplicate asset path ignored");
                self.stats.skipped += 1;
                return;
            }
            Some(TreeNode::File(_)) => {
                debug!(path = %key, asset = %asset.id, "Duplicate asset path replaces earlier asset");
                self.stats.files -= 1;
            }
            None => {}
        }

        let file = FileNode {
            key: key.clone(),
            asset_id: asset.id,
            checksum: asset.checksum,
            size: asset.size.unwrap_or_default(),
            mod_time: asset.last_modified.unwrap_or(self.cache.built_at()),
        };
        self.cache.insert(TreeNode::File(file));
        self.stats.files += 1;
        self.link_ancestors(&key);
    }

    fn link_ancestors(&mut self, key: &CacheKey) {
        let built_at = self.cache.built_at();
        let mut child = key.clone();
        for ancestor in key.ancestors() {
            let existed = match self.cache.get(&ancestor) {
                Some(TreeNode::Directory(_)) => true,
                Some(TreeNode::File(_)) => {
                    warn!(path = %ancestor, "Directory replaces a file asset with the same path");
                    self.stats.files -= 1;
                    self.stats.skipped += 1;
                    false
                }
                None => false,
            };
            if !existed {
                self.cache.insert(TreeNode::Directory(DirectoryNode::new(
                    ancestor.clone(),
                    built_at,
                )));
            }
            if let Some(dir) = self.cache.directory_mut(&ancestor) {
                dir.add_child(child);
            }
            if existed {
                return;
            }
            child = ancestor;
        }
    }
}
