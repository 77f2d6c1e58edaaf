//! Lazy, one-shot enumeration of candidate files under a root.
//!
//! - A root that is a file yields exactly that file, filter not applied
//! - A root that is a directory is walked depth-first in lexical order;
//!   unreadable directories are logged and skipped

use super::filter::FileFilter;
use crate::kernel::services::ports::search::{Result, SearchError};
use ignore::{Walk, WalkBuilder};
use std::path::{Path, PathBuf};

pub struct PathScanner {
    inner: ScanSource,
    filter: FileFilter,
}

enum ScanSource {
    Single(Option<PathBuf>),
    Tree(Walk),
}

impl PathScanner {
    pub fn new(root: &Path, filter: FileFilter) -> Result<Self> {
        let inner = if root.is_file() {
            ScanSource::Single(Some(root.to_path_buf()))
        } else if root.is_dir() {
            let walker = WalkBuilder::new(root)
                .standard_filters(false)
                .follow_links(false)
                .sort_by_file_name(|a, b| a.cmp(b))
                .build();
            ScanSource::Tree(walker)
        } else {
            return Err(SearchError::InvalidTarget(root.to_path_buf()));
        };

        Ok(Self { inner, filter })
    }
}

impl Iterator for PathScanner {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        match &mut self.inner {
            ScanSource::Single(path) => path.take(),
            ScanSource::Tree(walker) => loop {
                let entry = match walker.next()? {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping unreadable entry");
                        continue;
                    }
                };

                // Symlinked files count; symlinked directories are not descended.
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }

                let accepted = path
                    .file_name()
                    .map(|name| self.filter.accepts(&name.to_string_lossy()))
                    .unwrap_or(false);
                if accepted {
                    return Some(path.to_path_buf());
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/scanner.rs"]
mod tests;
