//! Path-keyed tree cache that grows as the user navigates.
//!
//! Nodes reference their children by path, never by ownership. A build pass
//! walks only paths the cache has not seen, then finalizes pending
//! directories bottom-up. Finalized subtrees are reused as-is by later
//! builds.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DirsizeError, Result};
use crate::fs::{normalize, EntryMeta, FileSystem, FsFault, Severity};
use crate::scanner::ScanWarning;

use super::node::{Node, NodeState};

/// What a build pass added to the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of new nodes
    pub added: usize,
    /// Entries left out or left empty because they could not be read
    pub warnings: Vec<ScanWarning>,
}

/// Path to node map covering every subtree explored in one session.
///
/// Not synchronized: one build or removal at a time.
#[derive(Debug, Clone, Default)]
pub struct TreeCache {
    nodes: HashMap<PathBuf, Node>,
}

impl TreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&Node> {
        self.nodes.get(&normalize(path))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(&normalize(path))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Extend the cache with the subtree rooted at `root`.
    ///
    /// Paths already cached are linked to a pending parent but never walked
    /// again. Vanished or unreadable entries below `root` are left out; any
    /// other read failure aborts the pass and removes every node it added.
    pub fn build<F: FileSystem + ?Sized>(&mut self, fs: &F, root: &Path) -> Result<BuildStats> {
        let root = normalize(root);
        let mut stats = BuildStats::default();

        if self.nodes.contains_key(&root) {
            tracing::debug!(path = %root.display(), "subtree already cached");
            return Ok(stats);
        }

        let meta = fs
            .symlink_metadata(&root)
            .map_err(|e| DirsizeError::from_io(&root, e))?;

        let mut inserted = Vec::new();
        if let Err(err) = self.walk(fs, &root, meta, &mut inserted, &mut stats.warnings) {
            tracing::debug!(
                path = %root.display(),
                discarded = inserted.len(),
                "build aborted, rolling back"
            );
            for path in &inserted {
                self.nodes.remove(path);
            }
            return Err(err);
        }

        self.finalize(&root);
        stats.added = inserted.len();
        tracing::debug!(path = %root.display(), added = stats.added, "build complete");
        Ok(stats)
    }

    /// Pre-order walk inserting every path not yet cached.
    fn walk<F: FileSystem + ?Sized>(
        &mut self,
        fs: &F,
        root: &Path,
        root_meta: EntryMeta,
        inserted: &mut Vec<PathBuf>,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<()> {
        let mut stack = Vec::new();
        self.insert(fs, root.to_path_buf(), root_meta, &mut stack, inserted, warnings)?;

        while let Some(path) = stack.pop() {
            if self.nodes.contains_key(&path) {
                self.link_to_parent(&path);
                continue;
            }

            let meta = match fs.symlink_metadata(&path) {
                Ok(m) => m,
                Err(err) => {
                    tolerate(&path, err, warnings)?;
                    continue;
                }
            };

            self.insert(fs, path, meta, &mut stack, inserted, warnings)?;
        }

        Ok(())
    }

    fn insert<F: FileSystem + ?Sized>(
        &mut self,
        fs: &F,
        path: PathBuf,
        meta: EntryMeta,
        stack: &mut Vec<PathBuf>,
        inserted: &mut Vec<PathBuf>,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<()> {
        let node = if meta.is_dir {
            let listing = match fs.read_dir(&path) {
                Ok(l) => l,
                Err(err) => {
                    tolerate(&path, err, warnings)?;
                    Vec::new()
                }
            };
            // reversed so the first child is popped first
            stack.extend(listing.iter().rev().map(|child| path.join(&child.name)));
            Node::pending_dir(path.clone())
        } else {
            Node::file(path.clone(), meta.len)
        };

        self.link_to_parent(&path);
        self.nodes.insert(path.clone(), node);
        inserted.push(path);
        Ok(())
    }

    /// Append `path` to its parent's children while the parent is pending.
    fn link_to_parent(&mut self, path: &Path) {
        let Some(parent) = path.parent() else {
            return;
        };
        if let Some(Node {
            state: NodeState::Pending { children },
            ..
        }) = self.nodes.get_mut(parent)
        {
            debug_assert!(!children.iter().any(|c| c == path));
            children.push(path.to_path_buf());
        }
    }

    /// Sum pending directories bottom-up; finalized nodes are kept as they are.
    fn finalize(&mut self, path: &Path) -> u64 {
        let children = match self.nodes.get_mut(path) {
            None => return 0,
            Some(node) => match &mut node.state {
                NodeState::Finalized { size, .. } => return *size,
                NodeState::Pending { children } => std::mem::take(children),
            },
        };

        let size = children.iter().map(|child| self.finalize(child)).sum();

        if let Some(node) = self.nodes.get_mut(path) {
            node.state = NodeState::Finalized { size, children };
        }
        size
    }

    /// Children of `directory`, largest first; equal sizes keep listing order.
    pub fn sorted_children(&self, directory: &Path) -> Vec<&Node> {
        let node = match self.nodes.get(&normalize(directory)) {
            Some(node) => node,
            None => return Vec::new(),
        };

        let mut children: Vec<&Node> = node
            .children()
            .iter()
            .filter_map(|child| self.nodes.get(child))
            .collect();
        children.sort_by(|a, b| b.size().cmp(&a.size()));
        children
    }

    /// Forget `path` after it was deleted from disk.
    ///
    /// Drops the node and everything below it, unlinks it from its parent
    /// and takes its size off every ancestor that contains it. Returns the
    /// size removed, or `None` when the path was not cached.
    pub fn remove_subtree(&mut self, path: &Path) -> Option<u64> {
        let path = normalize(path);

        let removed = match self.nodes.remove(&path) {
            Some(node) => node,
            None => {
                if let Some(parent) = path.parent().and_then(|p| self.nodes.get_mut(p)) {
                    parent.unlink_child(&path, 0);
                }
                return None;
            }
        };
        let size = removed.size();

        let mut stack: Vec<PathBuf> = removed.children().to_vec();
        while let Some(descendant) = stack.pop() {
            if let Some(node) = self.nodes.remove(&descendant) {
                stack.extend_from_slice(node.children());
            }
        }

        let mut current = path.clone();
        while let Some(parent) = current.parent().map(Path::to_path_buf) {
            let node = match self.nodes.get_mut(&parent) {
                Some(node) => node,
                None => break,
            };
            let linked = if current == path {
                node.unlink_child(&current, size)
            } else if node.has_child(&current) {
                node.shrink(size);
                true
            } else {
                false
            };
            if !linked {
                break;
            }
            current = parent;
        }

        tracing::debug!(path = %path.display(), size, "removed from cache");
        Some(size)
    }
}

/// Swallow vanished and unreadable entries; fail on anything else.
fn tolerate(path: &Path, err: io::Error, warnings: &mut Vec<ScanWarning>) -> Result<()> {
    let fault = FsFault::of(&err);
    match fault.severity() {
        Severity::Ignorable => {
            tracing::debug!(path = %path.display(), "entry vanished during build");
            Ok(())
        }
        Severity::Warning => {
            tracing::warn!(path = %path.display(), error = %err, "skipping unreadable entry");
            warnings.push(ScanWarning {
                path: path.to_path_buf(),
                fault,
            });
            Ok(())
        }
        Severity::Fatal => Err(DirsizeError::from_io(path, err)),
    }
}
