use std::path::{Path, PathBuf};

use crate::fs::EntryKind;

/// Build progress of a cached entry.
///
/// A path with no cache entry has not been visited yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    /// Directory whose children are still being collected.
    Pending { children: Vec<PathBuf> },
    /// Size and children are complete and can be reused.
    Finalized { size: u64, children: Vec<PathBuf> },
}

/// One file or directory in the tree cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Normalized path, also the cache key
    pub path: PathBuf,

    pub kind: EntryKind,

    pub(crate) state: NodeState,
}

impl Node {
    pub(crate) fn file(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            kind: EntryKind::File,
            state: NodeState::Finalized {
                size,
                children: Vec::new(),
            },
        }
    }

    pub(crate) fn pending_dir(path: PathBuf) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            state: NodeState::Pending {
                children: Vec::new(),
            },
        }
    }

    /// Entry name (last component of path)
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Aggregate size in bytes; zero until finalized.
    pub fn size(&self) -> u64 {
        match &self.state {
            NodeState::Pending { .. } => 0,
            NodeState::Finalized { size, .. } => *size,
        }
    }

    /// Immediate children in listing order.
    pub fn children(&self) -> &[PathBuf] {
        match &self.state {
            NodeState::Pending { children } | NodeState::Finalized { children, .. } => children,
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, NodeState::Finalized { .. })
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub(crate) fn has_child(&self, path: &Path) -> bool {
        self.children().iter().any(|c| c == path)
    }

    /// Drop `path` from the children and take `size` off this node.
    ///
    /// Returns false when `path` is not a child.
    pub(crate) fn unlink_child(&mut self, path: &Path, removed_size: u64) -> bool {
        let children = match &mut self.state {
            NodeState::Pending { children } | NodeState::Finalized { children, .. } => children,
        };
        let before = children.len();
        children.retain(|c| c != path);
        if children.len() == before {
            return false;
        }
        self.shrink(removed_size);
        true
    }

    pub(crate) fn shrink(&mut self, removed_size: u64) {
        if let NodeState::Finalized { size, .. } = &mut self.state {
            *size = size.saturating_sub(removed_size);
        }
    }
}
