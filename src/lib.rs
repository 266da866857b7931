//! Nexusfs: a hierarchical filesystem view over a repository manager
//!
//! Repository managers expose each repository as a flat, paginated list of
//! assets addressed by slash-separated paths. This crate pages through that
//! listing, synthesizes the implied directory tree, caches it per repository,
//! and answers directory listings and object lookups against the cache.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod path;
pub mod remote;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod view;

pub use error::{NexusError, RemoteError};
pub use types::{AssetDescriptor, CacheKey, Checksum, HashType, UploadRequest};
pub use view::{DirEntry, DirectoryEntry, NexusFs, ObjectEntry};
