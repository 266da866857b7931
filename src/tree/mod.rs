//! Directory tree synthesized from a flat asset listing

pub mod cache;
pub mod materializer;
pub mod node;

pub use cache::TreeCache;
pub use materializer::{MaterializeStats, TreeMaterializer};
pub use node::{DirectoryNode, FileNode, TreeNode};
