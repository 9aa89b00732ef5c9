use std::path::PathBuf;

use serde::Serialize;

use crate::fs::EntryKind;

/// One immediate child of a scanned directory with its aggregate size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    /// Full path of the child
    pub path: PathBuf,

    /// File or directory, as reported by the listing
    pub kind: EntryKind,

    /// Aggregate size in bytes
    pub size: u64,

    /// Number of unreadable entries skipped while sizing this child
    pub warnings: usize,
}

impl ScanEntry {
    /// Last path component, or the full path when there is none.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// True when part of this child could not be read.
    pub fn is_partial(&self) -> bool {
        self.warnings > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_entry_name() {
        let entry = ScanEntry {
            path: PathBuf::from("/home/user/projects"),
            kind: EntryKind::Directory,
            size: 1024,
            warnings: 0,
        };
        assert_eq!(entry.name(), "projects");
        assert!(!entry.is_partial());
    }

    #[test]
    fn test_scan_entry_serializes_kind() {
        let entry = ScanEntry {
            path: PathBuf::from("/forbidden"),
            kind: EntryKind::Directory,
            size: 0,
            warnings: 2,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""kind":"dir""#));
        assert!(entry.is_partial());
    }
}
