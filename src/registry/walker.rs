//! Single-level directory listing for the course tree

use crate::error::RegistryError;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Directory child types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File { path: PathBuf },
    Directory { path: PathBuf },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File { path } | Entry::Directory { path } => path,
        }
    }

    /// File or directory name as UTF-8, lossy
    pub fn name(&self) -> String {
        self.path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Lists the immediate children of a directory, sorted by name, skipping
/// hidden entries (names starting with `.`).
pub struct Walker {
    root: PathBuf,
    follow_symlinks: bool,
}

impl Walker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: true,
        }
    }

    /// Walk one level and collect entries
    ///
    /// Returns entries sorted by file name for determinism. Only a failure
    /// to read the root itself is an error; children that cannot be read
    /// (dangling symlinks, permission errors) are skipped with a warning.
    pub fn children(&self) -> Result<Vec<Entry>, RegistryError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker.into_iter().filter_entry(|e| !is_hidden(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(RegistryError::Walk {
                        path: self.root.clone(),
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!(
                        root = %self.root.display(),
                        path = ?e.path(),
                        error = %e,
                        "Skipping unreadable entry"
                    );
                    continue;
                }
            };

            let path = entry.path().to_path_buf();
            let file_type = entry.file_type();
            if file_type.is_file() {
                entries.push(Entry::File { path });
            } else if file_type.is_dir() {
                entries.push(Entry::Directory { path });
            }
        }

        Ok(entries)
    }

    /// Immediate subdirectories only
    pub fn directories(&self) -> Result<Vec<PathBuf>, RegistryError> {
        Ok(self
            .children()?
            .into_iter()
            .filter_map(|e| match e {
                Entry::Directory { path } => Some(path),
                Entry::File { .. } => None,
            })
            .collect())
    }

    /// Immediate files only
    pub fn files(&self) -> Result<Vec<PathBuf>, RegistryError> {
        Ok(self
            .children()?
            .into_iter()
            .filter_map(|e| match e {
                Entry::File { path } => Some(path),
                Entry::Directory { .. } => None,
            })
            .collect())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}
