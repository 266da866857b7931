//! Tooling Layer
//!
//! Command-line surface over the filesystem view.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
