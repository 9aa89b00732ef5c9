use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DirsizeError, Result};
use crate::fs::{FileSystem, FsFault, Severity};

/// A tolerated fault met while summing a subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub fault: FsFault,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.fault)
    }
}

/// Aggregate size of one path plus whatever was skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeReport {
    pub bytes: u64,
    pub warnings: Vec<ScanWarning>,
}

impl SizeReport {
    /// True when part of the subtree could not be read.
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Aggregate byte size of `path`.
///
/// Files report their link metadata length, directories the sum of their
/// descendants. Vanished entries count as zero; unreadable entries are
/// skipped with a warning.
pub fn size_of<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<u64> {
    measure(fs, path).map(|report| report.bytes)
}

/// Like [`size_of`], also returning the warnings met along the way.
pub fn measure<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<SizeReport> {
    let mut warnings = Vec::new();
    let bytes = aggregate(fs, path, &mut warnings)?;
    Ok(SizeReport { bytes, warnings })
}

fn aggregate<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    warnings: &mut Vec<ScanWarning>,
) -> Result<u64> {
    let meta = match fs.symlink_metadata(path) {
        Ok(m) => m,
        Err(err) => return tolerate(path, err, warnings),
    };

    if !meta.is_dir {
        return Ok(meta.len);
    }

    let listing = match fs.read_dir(path) {
        Ok(l) => l,
        Err(err) => return tolerate(path, err, warnings),
    };

    let mut sum = 0u64;
    for child in listing {
        sum += aggregate(fs, &path.join(&child.name), warnings)?;
    }
    Ok(sum)
}

/// Zero contribution for ignorable and warning faults, error otherwise.
fn tolerate(path: &Path, err: io::Error, warnings: &mut Vec<ScanWarning>) -> Result<u64> {
    let fault = FsFault::of(&err);
    match fault.severity() {
        Severity::Ignorable => {
            tracing::debug!(path = %path.display(), "entry vanished during scan");
            Ok(0)
        }
        Severity::Warning => {
            tracing::warn!(path = %path.display(), error = %err, "skipping unreadable entry");
            warnings.push(ScanWarning {
                path: path.to_path_buf(),
                fault,
            });
            Ok(0)
        }
        Severity::Fatal => Err(DirsizeError::from_io(path, err)),
    }
}

/// Format a byte count with two decimals in the largest unit (up to GB)
/// whose quantity is at least one.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}
