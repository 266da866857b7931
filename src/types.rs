//! Core types shared by the asset source, the tree cache and the listing view.

use crate::path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// CacheKey: repository-qualified path with no leading, trailing or doubled separators
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(raw: &str) -> Self {
        CacheKey(path::normalize(raw))
    }

    /// Key for `relative` inside `repository`.
    pub fn for_asset(repository: &str, relative: &str) -> Self {
        CacheKey(path::join(repository, relative))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parent(&self) -> Option<CacheKey> {
        if self.0.is_empty() {
            return None;
        }
        let (parent, _) = path::split_parent(&self.0);
        Some(CacheKey(parent.to_string()))
    }

    pub fn name(&self) -> &str {
        path::split_parent(&self.0).1
    }

    /// Proper, non-empty ancestors from the immediate parent up to the first segment.
    pub fn ancestors(&self) -> impl Iterator<Item = CacheKey> + '_ {
        path::ancestors(&self.0).map(|p| CacheKey(p.to_string()))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(raw: &str) -> Self {
        CacheKey::new(raw)
    }
}

/// Content digests reported by the repository manager (hex encoded)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    #[serde(default)]
    pub md5: String,
    #[serde(default)]
    pub sha1: String,
}

/// Hash algorithms the remote reports for every asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    Md5,
    Sha1,
}

impl HashType {
    pub const SUPPORTED: [HashType; 2] = [HashType::Md5, HashType::Sha1];
}

impl Checksum {
    pub fn get(&self, hash: HashType) -> &str {
        match hash {
            HashType::Md5 => &self.md5,
            HashType::Sha1 => &self.sha1,
        }
    }
}

/// A single asset as produced by the paged asset source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub id: String,
    pub repository: String,
    /// Path relative to the repository
    pub path: String,
    pub checksum: Checksum,
    /// None when the listing call did not report a size
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub download_url: String,
}

/// Richer per-asset metadata from the asset detail call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDetail {
    pub last_modified: Option<DateTime<Utc>>,
    pub checksum: Checksum,
    pub download_url: String,
}

/// One page of the flat asset listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetPage {
    pub items: Vec<AssetDescriptor>,
    pub continuation_token: Option<String>,
}

/// Content and metadata for a write
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub content: Vec<u8>,
    /// Declared size; uploads may proceed without one
    pub size: Option<u64>,
    pub content_type: Option<String>,
}

impl UploadRequest {
    pub fn new(content: Vec<u8>) -> Self {
        let size = Some(content.len() as u64);
        Self {
            content,
            size,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}
