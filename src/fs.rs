//! Filesystem access used by the aggregator and the tree cache.
//!
//! Everything that touches the disk goes through [`FileSystem`], so tests can
//! count reads or inject faults without a real directory tree.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use nix::errno::Errno;
use serde::Serialize;

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    /// File name of the child (last path component)
    pub name: OsString,
    /// True if the child itself is a directory (links are not followed)
    pub is_dir: bool,
}

/// Metadata of a single path, read without following links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta {
    /// Byte length reported by the metadata
    pub len: u64,
    /// True if the path is a directory
    pub is_dir: bool,
}

/// Directory listing and metadata reads.
pub trait FileSystem: Send + Sync {
    /// List the immediate children of `path`.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirListing>>;

    /// Read the link metadata of `path`.
    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMeta>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirListing>> {
        let entries = fs::read_dir(path)?.map(|entry| {
            entry.map(|e| (e.file_name(), e.file_type().map(|t| t.is_dir())))
        });
        let mut listing = collect_listing(entries)?;
        // read_dir order is filesystem dependent
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMeta> {
        let metadata = fs::symlink_metadata(path)?;
        Ok(EntryMeta {
            len: metadata.len(),
            is_dir: metadata.is_dir(),
        })
    }
}

/// Gather `(name, is_dir)` pairs from a directory read.
///
/// A child that vanished between the listing and its file type read is left
/// out; any other failure fails the listing.
fn collect_listing<I>(entries: I) -> io::Result<Vec<DirListing>>
where
    I: IntoIterator<Item = io::Result<(OsString, io::Result<bool>)>>,
{
    let mut listing = Vec::new();
    for entry in entries {
        let (name, file_type) = match entry {
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            other => other?,
        };
        let is_dir = match file_type {
            Ok(is_dir) => is_dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err),
        };
        listing.push(DirListing { name, is_dir });
    }
    Ok(listing)
}

/// Kind of a listed or cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    #[serde(rename = "dir")]
    Directory,
}

impl EntryKind {
    pub fn from_is_dir(is_dir: bool) -> Self {
        if is_dir {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => f.write_str("file"),
            EntryKind::Directory => f.write_str("dir"),
        }
    }
}

/// How a failed filesystem call is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFault {
    /// The path vanished (typically a concurrent delete)
    NotFound,
    /// The process may not read the path
    PermissionDenied,
    /// The platform reported a bad file descriptor mid-enumeration
    DescriptorFault,
    /// Anything else
    Other,
}

/// How far a fault is allowed to travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Contributes nothing and is not surfaced
    Ignorable,
    /// Logged and reported, the operation carries on
    Warning,
    /// Aborts the current operation
    Fatal,
}

impl FsFault {
    pub fn of(err: &io::Error) -> Self {
        if err.raw_os_error() == Some(Errno::EBADF as i32) {
            return FsFault::DescriptorFault;
        }
        match err.kind() {
            io::ErrorKind::NotFound => FsFault::NotFound,
            io::ErrorKind::PermissionDenied => FsFault::PermissionDenied,
            _ => FsFault::Other,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            FsFault::NotFound => Severity::Ignorable,
            FsFault::PermissionDenied | FsFault::DescriptorFault => Severity::Warning,
            FsFault::Other => Severity::Fatal,
        }
    }
}

impl fmt::Display for FsFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FsFault::NotFound => "not found",
            FsFault::PermissionDenied => "permission denied",
            FsFault::DescriptorFault => "bad file descriptor",
            FsFault::Other => "I/O error",
        };
        f.write_str(text)
    }
}

/// Lexically normalize a path: drops `.` components and trailing separators
/// and folds `..` into the preceding normal component.
///
/// Does not touch the filesystem, so links are not resolved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
