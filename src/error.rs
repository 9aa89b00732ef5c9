use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fs::FsFault;

/// Core library errors
#[derive(Error, Debug)]
pub enum DirsizeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Bad file descriptor while reading '{0}'")]
    DescriptorFault(PathBuf),

    #[error("Scan task for '{0}' stopped without reporting a result")]
    ScanTask(PathBuf),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl DirsizeError {
    /// Wrap an IO error for `path`, keeping the well-known faults distinct.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match FsFault::of(&source) {
            FsFault::NotFound => DirsizeError::PathNotFound(path.to_path_buf()),
            FsFault::PermissionDenied => DirsizeError::PermissionDenied(path.to_path_buf()),
            FsFault::DescriptorFault => DirsizeError::DescriptorFault(path.to_path_buf()),
            FsFault::Other => DirsizeError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DirsizeError>;
