use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid file or folder: {}", .0.display())]
    InvalidTarget(PathBuf),
    #[error("A keyword is required to search the folder {}", .0.display())]
    MissingKeyword(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to save results to {}: {source}", path.display())]
pub struct SaveError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// One (root, keyword) pair. An empty keyword against a single file
/// streams the whole file instead of matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub root: PathBuf,
    pub keyword: String,
}

impl ScanTarget {
    pub fn new(root: impl Into<PathBuf>, keyword: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            keyword: keyword.into(),
        }
    }

    /// Looks at the filesystem. Called once when a session starts; everything
    /// downstream uses the returned mode.
    pub fn detect_mode(&self) -> ScanMode {
        if self.keyword.is_empty() && self.root.is_file() {
            ScanMode::OpenFile
        } else {
            ScanMode::Keyword
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Keyword,
    /// Stream the whole file, no matching.
    OpenFile,
}

/// Strips the wrapping artifacts drop sources put around paths with spaces.
pub fn clean_dropped_path(raw: &str) -> PathBuf {
    let mut s = raw.trim();
    loop {
        let stripped = s
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .or_else(|| s.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')))
            .or_else(|| s.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')));
        match stripped {
            Some(inner) => s = inner.trim(),
            None => break,
        }
    }
    PathBuf::from(s)
}

/// Context span around one matching line. 1-based, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchWindow {
    pub start_line: usize,
    pub end_line: usize,
}

impl MatchWindow {
    pub fn around(match_line: usize, last_line: usize, context_lines: usize) -> Self {
        Self {
            start_line: match_line.saturating_sub(context_lines).max(1),
            end_line: match_line.saturating_add(context_lines).min(last_line),
        }
    }
}

/// Union of windows lying within the merge gap of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedBlock {
    pub start_line: usize,
    pub end_line: usize,
}

impl MergedBlock {
    /// First contextual line of the block, as shown in the header.
    pub fn anchor_line(&self) -> usize {
        self.start_line
    }

    pub fn line_count(&self) -> usize {
        self.end_line + 1 - self.start_line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatches {
    pub path: PathBuf,
    pub blocks: Vec<MergedBlock>,
    pub lines: Vec<String>,
    pub matched: bool,
}

impl FileMatches {
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            blocks: Vec::new(),
            lines: Vec::new(),
            matched: false,
        }
    }

    /// Contents of a block's lines paired with their 1-based numbers.
    pub fn block_lines(&self, block: MergedBlock) -> impl Iterator<Item = (usize, &str)> + '_ {
        (block.start_line..=block.end_line)
            .filter_map(move |n| self.lines.get(n - 1).map(|line| (n, line.as_str())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Completed,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEvent {
    FileHeader {
        path: PathBuf,
        anchor_line: usize,
    },
    Line {
        number: usize,
        content: String,
    },
    BlockEnd,
    /// Open-file mode only.
    RawLine(String),
    NoMatch,
    Error {
        path: PathBuf,
        message: String,
    },
    Progress {
        done: usize,
        total: usize,
    },
    Done {
        status: SearchStatus,
        message: Option<String>,
    },
}

impl ResultEvent {
    /// Text this event contributes to the assembled output.
    pub fn render(&self) -> Option<String> {
        match self {
            ResultEvent::FileHeader { path, anchor_line } => Some(format!(
                "--- {} (Context around line {}) ---\n",
                path.display(),
                anchor_line
            )),
            ResultEvent::Line { number, content } => Some(format!("{}: {}\n", number, content)),
            ResultEvent::BlockEnd => Some("---\n".to_string()),
            ResultEvent::RawLine(content) => Some(format!("{}\n", content)),
            ResultEvent::NoMatch => Some("No matches found.\n".to_string()),
            ResultEvent::Error { path, message } => {
                Some(format!("Error reading {}: {}\n", path.display(), message))
            }
            ResultEvent::Progress { .. } | ResultEvent::Done { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ResultEvent::Done { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMessage {
    pub search_id: u64,
    pub event: ResultEvent,
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/search.rs"]
mod tests;
