//! Listing entries rendered relative to the filesystem root

use crate::tree::{DirectoryNode, FileNode};
use crate::types::{Checksum, HashType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub path: String,
    pub mod_time: DateTime<Utc>,
    /// Number of immediate children
    pub items: usize,
}

/// File entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    pub path: String,
    pub size: u64,
    pub checksum: Checksum,
    pub mod_time: DateTime<Utc>,
}

impl ObjectEntry {
    pub(crate) fn from_node(path: String, file: &FileNode) -> Self {
        Self {
            path,
            size: file.size,
            checksum: file.checksum.clone(),
            mod_time: file.mod_time,
        }
    }

    /// Digest of the requested type; empty when the remote did not report one.
    pub fn hash(&self, hash: HashType) -> &str {
        self.checksum.get(hash)
    }

    pub fn name(&self) -> &str {
        crate::path::split_parent(&self.path).1
    }
}

impl DirectoryEntry {
    pub(crate) fn from_node(path: String, dir: &DirectoryNode) -> Self {
        Self {
            path,
            mod_time: dir.mod_time,
            items: dir.children.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DirEntry {
    Directory(DirectoryEntry),
    Object(ObjectEntry),
}

impl DirEntry {
    pub fn path(&self) -> &str {
        match self {
            DirEntry::Directory(dir) => &dir.path,
            DirEntry::Object(object) => &object.path,
        }
    }

    pub fn mod_time(&self) -> DateTime<Utc> {
        match self {
            DirEntry::Directory(dir) => dir.mod_time,
            DirEntry::Object(object) => object.mod_time,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, DirEntry::Directory(_))
    }

    pub fn as_object(&self) -> Option<&ObjectEntry> {
        match self {
            DirEntry::Object(object) => Some(object),
            DirEntry::Directory(_) => None,
        }
    }
}
