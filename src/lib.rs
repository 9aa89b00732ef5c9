//! dirsize - aggregate directory sizes, sorted
//!
//! This crate provides functionality for:
//! - Sizing every entry of a directory concurrently for a quick first listing
//! - An incremental tree cache for drilling into subtrees without re-reading them
//! - Interactive TUI for browsing and deleting

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod delete;
pub mod error;
pub mod fs;
pub mod scanner;
pub mod tui;

// Re-export commonly used types
pub use cache::TreeCache;
pub use config::Config;
pub use error::{DirsizeError, Result};
pub use fs::{FileSystem, OsFileSystem};
pub use scanner::{format_size, scan_top_level, size_of};
