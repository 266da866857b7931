//! TreeCache
//!
//! Maps canonical keys to tree nodes for one materialization pass of one
//! repository. Entries are only added; the single in-place mutation is a
//! directory's child set growing.

use super::node::{DirectoryNode, FileNode, TreeNode};
use crate::error::NexusError;
use crate::types::CacheKey;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeCache {
    repository: String,
    root: CacheKey,
    built_at: DateTime<Utc>,
    nodes: HashMap<CacheKey, TreeNode>,
}

impl TreeCache {
    /// Create a cache holding only the repository root directory.
    pub fn new(repository: &str, built_at: DateTime<Utc>) -> Self {
        let root = CacheKey::new(repository);
        let mut nodes = HashMap::new();
        nodes.insert(
            root.clone(),
            TreeNode::Directory(DirectoryNode::new(root.clone(), built_at)),
        );
        Self {
            repository: root.as_str().to_string(),
            root,
            built_at,
            nodes,
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn root(&self) -> &CacheKey {
        &self.root
    }

    /// Timestamp of the pass that built this cache; used for every synthesized directory.
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Node count; never below one since the root is always present.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn file_count(&self) -> usize {
        self.nodes.values().filter(|node| !node.is_directory()).count()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&TreeNode> {
        self.nodes.get(key)
    }

    pub fn get_file(&self, key: &CacheKey) -> Option<&FileNode> {
        self.nodes.get(key).and_then(TreeNode::as_file)
    }

    pub fn get_directory(&self, key: &CacheKey) -> Option<&DirectoryNode> {
        self.nodes.get(key).and_then(TreeNode::as_directory)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheKey, &TreeNode)> {
        self.nodes.iter()
    }

    /// Immediate children of a directory, in key order.
    pub fn children(&self, key: &CacheKey) -> Result<Vec<&TreeNode>, NexusError> {
        let dir = self
            .get_directory(key)
            .ok_or_else(|| NexusError::NotFound(format!("directory not found: {}", key)))?;
        dir.children
            .iter()
            .map(|child| self.resolve(child))
            .collect()
    }

    /// Every file below a directory, each exactly once, in depth-first key order.
    pub fn files_under(&self, key: &CacheKey) -> Result<Vec<&FileNode>, NexusError> {
        let dir = self
            .get_directory(key)
            .ok_or_else(|| NexusError::NotFound(format!("directory not found: {}", key)))?;
        let mut files = Vec::new();
        let mut pending: Vec<&CacheKey> = dir.children.iter().rev().collect();
        while let Some(child) = pending.pop() {
            match self.resolve(child)? {
                TreeNode::File(file) => files.push(file),
                TreeNode::Directory(sub) => pending.extend(sub.children.iter().rev()),
            }
        }
        Ok(files)
    }

    fn resolve(&self, key: &CacheKey) -> Result<&TreeNode, NexusError> {
        self.nodes.get(key).ok_or_else(|| {
            NexusError::Protocol(format!("dangling child key {} in tree cache", key))
        })
    }

    /// Check the structural invariants and return a description of every violation.
    pub fn verify(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.get_directory(&self.root).is_none() {
            violations.push(format!("root {} is not a directory", self.root));
        }
        for (key, node) in &self.nodes {
            if node.key() != key {
                violations.push(format!("node {} stored under key {}", node.key(), key));
            }
            if key == &self.root {
                continue;
            }
            let parent = match key.parent() {
                Some(parent) if !parent.is_empty() => parent,
                _ => {
                    violations.push(format!("{} has no parent below the root", key));
                    continue;
                }
            };
            match self.get_directory(&parent) {
                Some(dir) if dir.children.contains(key) => {}
                Some(_) => violations.push(format!("{} is not linked from {}", key, parent)),
                None => violations.push(format!("{} has no parent directory {}", key, parent)),
            }
            if let TreeNode::Directory(dir) = node {
                if dir.children.is_empty() {
                    violations.push(format!("directory {} has no descendants", key));
                }
            }
        }
        for node in self.nodes.values() {
            if let TreeNode::Directory(dir) = node {
                for child in &dir.children {
                    if child.parent().as_ref() != Some(&dir.key) {
                        violations.push(format!(
                            "{} is not an immediate child of {}",
                            child, dir.key
                        ));
                    }
                    if !self.nodes.contains_key(child) {
                        violations.push(format!("{} lists missing child {}", dir.key, child));
                    }
                }
            }
        }
        violations
    }

    pub(crate) fn insert(&mut self, node: TreeNode) -> Option<TreeNode> {
        self.nodes.insert(node.key().clone(), node)
    }

    pub(crate) fn directory_mut(&mut self, key: &CacheKey) -> Option<&mut DirectoryNode> {
        match self.nodes.get_mut(key) {
            Some(TreeNode::Directory(dir)) => Some(dir),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cache_has_root_directory() {
        let cache = TreeCache::new("/repo1/", Utc::now());
        assert_eq!(cache.repository(), "repo1");
        assert_eq!(cache.len(), 1);
        let root = cache.get_directory(&CacheKey::new("repo1")).unwrap();
        assert!(root.children.is_empty());
        assert!(cache.verify().is_empty());
    }

    #[test]
    fn test_children_of_missing_directory() {
        let cache = TreeCache::new("repo1", Utc::now());
        let err = cache.children(&CacheKey::new("repo1/nope")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_verify_reports_unlinked_node() {
        let now = Utc::now();
        let mut cache = TreeCache::new("repo1", now);
        cache.insert(TreeNode::Directory(DirectoryNode::new(
            CacheKey::new("repo1/a"),
            now,
        )));
        let violations = cache.verify();
        assert!(violations.iter().any(|v| v.contains("not linked")));
        assert!(violations.iter().any(|v| v.contains("no descendants")));
    }
}
