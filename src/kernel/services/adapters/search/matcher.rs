//! Per-file keyword matching with merged context windows.
//!
//! Every line whose case-folded text contains the case-folded keyword gets a
//! ±`context_lines` window; windows are then swept in start order and merged
//! while the next one starts within `merge_gap` lines of the current end.

use crate::kernel::services::ports::search::{FileMatches, MatchWindow, MergedBlock};
use crate::kernel::services::ports::SearchSettings;
use memchr::memmem::Finder;
use std::io;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ContextMatcher {
    folded_keyword: String,
    context_lines: usize,
    merge_gap: usize,
}

impl ContextMatcher {
    pub fn new(keyword: &str, context_lines: usize, merge_gap: usize) -> Self {
        Self {
            folded_keyword: keyword.to_lowercase(),
            context_lines,
            merge_gap,
        }
    }

    pub fn from_settings(keyword: &str, settings: &SearchSettings) -> Self {
        Self::new(keyword, settings.context_lines, settings.merge_gap)
    }

    /// Reads `path` and matches it. Undecodable bytes are substituted.
    pub fn match_file(&self, path: &Path) -> io::Result<FileMatches> {
        let lines = read_lines_lossy(path)?;
        Ok(self.match_lines(path, lines))
    }

    pub fn match_lines(&self, path: &Path, lines: Vec<String>) -> FileMatches {
        if self.folded_keyword.is_empty() {
            return FileMatches {
                lines,
                ..FileMatches::empty(path)
            };
        }

        let finder = Finder::new(self.folded_keyword.as_bytes());
        let last_line = lines.len();
        let windows: Vec<MatchWindow> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| finder.find(line.to_lowercase().as_bytes()).is_some())
            .map(|(idx, _)| MatchWindow::around(idx + 1, last_line, self.context_lines))
            .collect();

        let blocks = merge_windows(windows, self.merge_gap);
        FileMatches {
            path: path.to_path_buf(),
            matched: !blocks.is_empty(),
            blocks,
            lines,
        }
    }
}

/// Sweep-merge of context windows into disjoint blocks sorted by start line.
pub fn merge_windows(mut windows: Vec<MatchWindow>, merge_gap: usize) -> Vec<MergedBlock> {
    windows.sort_by_key(|w| w.start_line);

    let mut iter = windows.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    let (mut cur_start, mut cur_end) = (first.start_line, first.end_line);
    for window in iter {
        if window.start_line <= cur_end.saturating_add(merge_gap) {
            cur_end = cur_end.max(window.end_line);
        } else {
            blocks.push(MergedBlock {
                start_line: cur_start,
                end_line: cur_end,
            });
            cur_start = window.start_line;
            cur_end = window.end_line;
        }
    }
    blocks.push(MergedBlock {
        start_line: cur_start,
        end_line: cur_end,
    });
    blocks
}

pub fn read_lines_lossy(path: &Path) -> io::Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/matcher.rs"]
mod tests;
