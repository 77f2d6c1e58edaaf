use crate::kernel::find::{MatchIndex, MatchSpan};
use crate::kernel::services::ports::search::{
    ResultEvent, SaveError, ScanMode, SearchMessage, SearchStatus,
};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Counting,
    Scanning,
    Finished(SearchStatus),
}

/// What `Progress` counts: files, or lines in open-file mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressUnit {
    #[default]
    Files,
    Lines,
}

/// Foreground view of one session: applies messages in arrival order and
/// owns the assembled text.
///
/// The find index is rebuilt lazily: appending text only marks it stale, and
/// the next find access rescans once for the whole batch.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub active_search_id: Option<u64>,
    pub phase: SearchPhase,
    pub unit: ProgressUnit,
    pub done: usize,
    pub total: usize,
    pub lines_found: usize,
    pub last_error: Option<String>,
    text: String,
    find: MatchIndex,
    find_stale: bool,
}

impl SearchState {
    pub fn begin_search(&mut self, search_id: u64, mode: ScanMode) {
        self.active_search_id = Some(search_id);
        self.phase = SearchPhase::Counting;
        self.unit = match mode {
            ScanMode::OpenFile => ProgressUnit::Lines,
            ScanMode::Keyword => ProgressUnit::Files,
        };
        self.done = 0;
        self.total = 0;
        self.lines_found = 0;
        self.last_error = None;
        self.text.clear();
        self.find.clear();
        self.find_stale = false;
    }

    pub fn apply_message(&mut self, msg: SearchMessage) -> bool {
        if self.active_search_id != Some(msg.search_id) {
            return false;
        }
        if matches!(self.phase, SearchPhase::Finished(_)) {
            return false;
        }

        let changed = match &msg.event {
            ResultEvent::Progress { done, total } => {
                let changed = self.done != *done
                    || self.total != *total
                    || self.phase != SearchPhase::Scanning;
                self.phase = SearchPhase::Scanning;
                self.done = *done;
                self.total = *total;
                changed
            }
            ResultEvent::Done { status, message } => {
                self.phase = SearchPhase::Finished(*status);
                if let Some(message) = message {
                    self.last_error = Some(message.clone());
                }
                true
            }
            ResultEvent::Line { .. } | ResultEvent::RawLine(_) => {
                self.lines_found += 1;
                true
            }
            _ => true,
        };

        if let Some(rendered) = msg.event.render() {
            self.text.push_str(&rendered);
            if !self.find.query().is_empty() {
                self.find_stale = true;
            }
        }

        changed
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.phase, SearchPhase::Counting | SearchPhase::Scanning)
    }

    pub fn outcome(&self) -> Option<SearchStatus> {
        match self.phase {
            SearchPhase::Finished(status) => Some(status),
            _ => None,
        }
    }

    pub fn progress_percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.done as f32 / self.total as f32) * 100.0
    }

    pub fn status_message(&self) -> String {
        match (self.phase, self.unit) {
            (SearchPhase::Idle, _) => String::new(),
            (SearchPhase::Counting, ProgressUnit::Files) => "Counting files...".to_string(),
            (SearchPhase::Counting, ProgressUnit::Lines) => "Opening file...".to_string(),
            (SearchPhase::Scanning, ProgressUnit::Files) if self.done == 0 => {
                format!("Searching in {} files...", self.total)
            }
            (SearchPhase::Scanning, ProgressUnit::Files) => {
                format!("Searching... {}/{}", self.done, self.total)
            }
            (SearchPhase::Scanning, ProgressUnit::Lines) => {
                format!("Reading... {}/{} lines", self.done, self.total)
            }
            (SearchPhase::Finished(SearchStatus::Completed), _) => {
                format!("Search complete - {} lines found", self.lines_found)
            }
            (SearchPhase::Finished(SearchStatus::Cancelled), _) => "Search cancelled".to_string(),
            (SearchPhase::Finished(SearchStatus::Failed), _) => format!(
                "Search error: {}",
                self.last_error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    /// Current find results. Text appended since the last access triggers
    /// one rebuild, which moves the cursor back to the first entry.
    pub fn find(&mut self) -> &MatchIndex {
        self.refresh_find();
        &self.find
    }

    pub fn set_find_query(&mut self, query: &str) {
        self.find.set_query(&self.text, query);
        self.find_stale = false;
    }

    pub fn find_next(&mut self) -> Option<MatchSpan> {
        self.refresh_find();
        self.find.find_next()
    }

    pub fn find_previous(&mut self) -> Option<MatchSpan> {
        self.refresh_find();
        self.find.find_previous()
    }

    fn refresh_find(&mut self) {
        if self.find_stale {
            self.find.rebuild(&self.text);
            self.find_stale = false;
        }
    }

    /// 1-based line of the assembled text containing `offset`.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        let end = offset.min(self.text.len());
        memchr::memchr_iter(b'\n', &self.text.as_bytes()[..end]).count() + 1
    }

    /// Writes the assembled text byte for byte.
    pub fn save_to(&self, path: &Path) -> Result<(), SaveError> {
        std::fs::write(path, self.text.as_bytes()).map_err(|source| SaveError {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/search.rs"]
mod tests;
