//! Filesystem doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dirsize::fs::{DirListing, EntryMeta, FileSystem, OsFileSystem};
use parking_lot::Mutex;

pub fn write_file(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(&vec![b'x'; len]).unwrap();
}

/// Records every path read through it.
#[derive(Default)]
pub struct CountingFs {
    inner: OsFileSystem,
    reads: Mutex<Vec<PathBuf>>,
}

impl CountingFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.reads.lock().len()
    }

    pub fn reads_under(&self, prefix: &Path) -> usize {
        self.reads
            .lock()
            .iter()
            .filter(|p| p.starts_with(prefix))
            .count()
    }

    pub fn reset(&self) {
        self.reads.lock().clear();
    }
}

impl FileSystem for CountingFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirListing>> {
        self.reads.lock().push(path.to_path_buf());
        self.inner.read_dir(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMeta> {
        self.reads.lock().push(path.to_path_buf());
        self.inner.symlink_metadata(path)
    }
}

/// Fault injected for one path.
#[derive(Debug, Clone, Copy)]
pub enum Injected {
    /// Listing the directory is denied
    DenyListing,
    /// Listing the directory fails with EBADF
    BadDescriptor,
    /// Reading metadata is denied
    DenyMetadata,
    /// Metadata read fails with an unexpected error
    Broken,
}

/// Passes through to the real filesystem except for injected paths.
#[derive(Default)]
pub struct FaultyFs {
    inner: OsFileSystem,
    faults: HashMap<PathBuf, Injected>,
}

impl FaultyFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fault(mut self, path: impl Into<PathBuf>, fault: Injected) -> Self {
        self.faults.insert(path.into(), fault);
        self
    }
}

impl FileSystem for FaultyFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirListing>> {
        match self.faults.get(path) {
            Some(Injected::DenyListing) => Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            Some(Injected::BadDescriptor) => {
                Err(io::Error::from_raw_os_error(nix::errno::Errno::EBADF as i32))
            }
            _ => self.inner.read_dir(path),
        }
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMeta> {
        match self.faults.get(path) {
            Some(Injected::DenyMetadata) => Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            Some(Injected::Broken) => Err(io::Error::new(io::ErrorKind::Other, "device gone")),
            _ => self.inner.symlink_metadata(path),
        }
    }
}

/// Returns every listing in reverse name order.
#[derive(Default)]
pub struct ReversedFs {
    inner: OsFileSystem,
}

impl ReversedFs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileSystem for ReversedFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirListing>> {
        let mut listing = self.inner.read_dir(path)?;
        listing.reverse();
        Ok(listing)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMeta> {
        self.inner.symlink_metadata(path)
    }
}
