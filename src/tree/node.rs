//! Tree node types: synthesized directories and concrete files

use crate::types::{CacheKey, Checksum};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// File node representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub key: CacheKey,
    pub asset_id: String,
    pub checksum: Checksum,
    pub size: u64,
    pub mod_time: DateTime<Utc>,
}

/// Directory node representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub key: CacheKey,
    pub children: BTreeSet<CacheKey>, // sorted, deduplicated
    pub mod_time: DateTime<Utc>,
}

impl DirectoryNode {
    pub fn new(key: CacheKey, mod_time: DateTime<Utc>) -> Self {
        Self {
            key,
            children: BTreeSet::new(),
            mod_time,
        }
    }

    /// Register a child; returns false when it was already known.
    pub fn add_child(&mut self, child: CacheKey) -> bool {
        self.children.insert(child)
    }
}

/// Tree node type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    File(FileNode),
    Directory(DirectoryNode),
}

impl TreeNode {
    pub fn key(&self) -> &CacheKey {
        match self {
            TreeNode::File(file) => &file.key,
            TreeNode::Directory(dir) => &dir.key,
        }
    }

    pub fn mod_time(&self) -> DateTime<Utc> {
        match self {
            TreeNode::File(file) => file.mod_time,
            TreeNode::Directory(dir) => dir.mod_time,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, TreeNode::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            TreeNode::Directory(dir) => Some(dir),
            TreeNode::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            TreeNode::File(file) => Some(file),
            TreeNode::Directory(_) => None,
        }
    }
}
