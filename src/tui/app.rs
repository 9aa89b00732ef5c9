//! Application state for the TUI.

use std::path::{Path, PathBuf};

use crate::cache::{Node, TreeCache};
use crate::delete::delete_and_forget;
use crate::fs::{normalize, EntryKind, OsFileSystem};
use crate::scanner::format_size;

/// The current UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal navigation mode.
    Normal,
    /// Confirmation dialog mode.
    Confirm(ConfirmAction),
    /// Help overlay mode.
    Help,
}

/// Action requiring confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Delete a file or directory.
    Delete,
}

/// A row of the directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
}

impl From<&Node> for ListEntry {
    fn from(node: &Node) -> Self {
        Self {
            path: node.path.clone(),
            name: node.name(),
            kind: node.kind,
            size: node.size(),
        }
    }
}

/// Main application state for the TUI.
///
/// Owns the tree cache for the whole session; every cache operation runs
/// on the UI thread, one at a time.
pub struct App {
    /// Directory the session started in.
    pub root: PathBuf,

    /// Directory currently listed.
    pub current: PathBuf,

    /// Sizes of everything explored so far.
    pub cache: TreeCache,

    /// Children of `current`, largest first.
    pub entries: Vec<ListEntry>,

    /// Currently selected index in entries.
    pub selected: usize,

    /// Current UI mode.
    pub mode: Mode,

    /// Ask before deleting.
    pub confirm_delete: bool,

    /// Application should quit.
    pub should_quit: bool,

    /// Status message to display.
    pub status_message: Option<String>,

    fs: OsFileSystem,
}

impl App {
    /// Create a new App instance. Nothing is read until [`App::open`].
    pub fn new(root: PathBuf) -> Self {
        let root = normalize(&root);
        Self {
            current: root.clone(),
            root,
            cache: TreeCache::new(),
            entries: Vec::new(),
            selected: 0,
            mode: Mode::Normal,
            confirm_delete: true,
            should_quit: false,
            status_message: None,
            fs: OsFileSystem,
        }
    }

    pub fn with_confirm_delete(mut self, confirm: bool) -> Self {
        self.confirm_delete = confirm;
        self
    }

    /// Build the cache for the current directory and list it.
    pub fn open(&mut self) {
        let current = self.current.clone();
        if self.load(&current) {
            self.refresh_entries();
        }
    }

    /// Get the currently selected entry, if any.
    pub fn selected_entry(&self) -> Option<&ListEntry> {
        self.entries.get(self.selected)
    }

    /// Aggregate size of the current directory.
    pub fn current_size(&self) -> Option<u64> {
        self.cache.get(&self.current).map(Node::size)
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.entries.len() - 1;
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, last as isize) as usize;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    /// Drill into the selected directory.
    pub fn enter_selected(&mut self) {
        let entry = match self.selected_entry() {
            Some(entry) => entry.clone(),
            None => return,
        };
        if !entry.kind.is_dir() {
            self.status_message = Some(format!("{} is not a directory", entry.name));
            return;
        }
        if self.load(&entry.path) {
            self.current = entry.path;
            self.selected = 0;
            self.refresh_entries();
        }
    }

    /// Move up to the parent directory, keeping the directory we left selected.
    pub fn go_parent(&mut self) {
        let parent = match self.current.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => {
                self.status_message = Some("Already at the top".to_string());
                return;
            }
        };
        if !self.load(&parent) {
            return;
        }
        let left = std::mem::replace(&mut self.current, parent);
        self.refresh_entries();
        self.selected = self
            .entries
            .iter()
            .position(|e| e.path == left)
            .unwrap_or(0);
    }

    /// Delete the selection now, or ask first when confirmation is on.
    pub fn request_delete(&mut self) {
        if self.selected_entry().is_none() {
            return;
        }
        if self.confirm_delete {
            self.mode = Mode::Confirm(ConfirmAction::Delete);
        } else {
            self.delete_selected();
        }
    }

    /// Remove the selected entry from disk and from the cache.
    pub fn delete_selected(&mut self) {
        let entry = match self.selected_entry() {
            Some(entry) => entry.clone(),
            None => return,
        };

        match delete_and_forget(&mut self.cache, &entry.path) {
            Ok(freed) => {
                self.status_message = Some(format!(
                    "Deleted {} ({})",
                    entry.name,
                    format_size(freed.unwrap_or(entry.size))
                ));
            }
            Err(err) => {
                tracing::warn!(path = %entry.path.display(), error = %err, "delete failed");
                self.status_message = Some(format!("Delete failed: {}", err));
            }
        }
        self.refresh_entries();
    }

    /// Forget everything and rebuild the current directory from disk.
    pub fn rescan(&mut self) {
        self.cache.clear();
        self.open();
        if self.status_message.is_none() {
            self.status_message = Some("Rescanned".to_string());
        }
    }

    /// Make sure `dir` is in the cache. Reports failures in the status line.
    fn load(&mut self, dir: &Path) -> bool {
        self.status_message = None;
        match self.cache.build(&self.fs, dir) {
            Ok(stats) => {
                if !stats.warnings.is_empty() {
                    self.status_message = Some(format!(
                        "{} entries could not be read",
                        stats.warnings.len()
                    ));
                }
                true
            }
            Err(err) => {
                self.status_message = Some(format!("Cannot open {}: {}", dir.display(), err));
                false
            }
        }
    }

    fn refresh_entries(&mut self) {
        self.entries = self
            .cache
            .sorted_children(&self.current)
            .into_iter()
            .map(ListEntry::from)
            .collect();
        if self.selected >= self.entries.len() {
            self.select_last();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_new() {
        let app = App::new(PathBuf::from("/home/user/"));
        assert_eq!(app.root, PathBuf::from("/home/user"));
        assert_eq!(app.current, app.root);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.selected, 0);
        assert!(!app.should_quit);
        assert!(app.entries.is_empty());
        assert!(app.cache.is_empty());
        assert!(app.confirm_delete);
    }

    #[test]
    fn test_app_selected_entry_empty() {
        let app = App::new(PathBuf::from("/"));
        assert!(app.selected_entry().is_none());
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut app = App::new(PathBuf::from("/"));
        app.entries = (0..3)
            .map(|i| ListEntry {
                path: PathBuf::from(format!("/e{}", i)),
                name: format!("e{}", i),
                kind: EntryKind::File,
                size: 0,
            })
            .collect();

        app.move_selection(-1);
        assert_eq!(app.selected, 0);
        app.move_selection(10);
        assert_eq!(app.selected, 2);
        app.move_selection(-1);
        assert_eq!(app.selected, 1);
        app.select_first();
        assert_eq!(app.selected, 0);
        app.select_last();
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_go_parent_at_filesystem_root() {
        let mut app = App::new(PathBuf::from("/"));
        app.go_parent();
        assert_eq!(app.current, PathBuf::from("/"));
        assert_eq!(app.status_message.as_deref(), Some("Already at the top"));
    }

    #[test]
    fn test_mode_equality() {
        assert_eq!(Mode::Normal, Mode::Normal);
        assert_eq!(
            Mode::Confirm(ConfirmAction::Delete),
            Mode::Confirm(ConfirmAction::Delete)
        );
        assert_ne!(Mode::Normal, Mode::Help);
    }
}
