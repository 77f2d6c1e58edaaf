//! Background search sessions.
//!
//! - Counting: one scanner pass to size the progress bar
//! - Scanning: second pass, one ContextMatcher run per candidate file
//! - Open-file mode: empty keyword on a single file streams every line
//!
//! Cancellation is polled: between files always, between lines only in
//! open-file mode. At most one session runs per coordinator.

use super::channel::{Disconnected, EventSender};
use super::filter::FileFilter;
use super::matcher::{read_lines_lossy, ContextMatcher};
use super::scanner::PathScanner;
use crate::kernel::services::ports::search::{
    ResultEvent, ScanMode, ScanTarget, SearchError, SearchStatus,
};
use crate::kernel::services::ports::SearchSettings;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static SEARCH_ID: AtomicU64 = AtomicU64::new(1);

fn next_search_id() -> u64 {
    SEARCH_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to one session: its id, its mode and the shared cancel flag.
#[derive(Debug, Clone)]
pub struct SearchTask {
    id: u64,
    mode: ScanMode,
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl SearchTask {
    pub fn new(mode: ScanMode) -> Self {
        Self {
            id: next_search_id(),
            mode,
            cancelled: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Mode the worker runs in, fixed when the session started.
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Set once `Done` is queued, or once the consumer is gone. A consumer
    /// that sees this and then drains the channel always finds `Done`.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub enum StartOutcome {
    Started(SearchTask),
    /// A session was still running; it has been asked to stop and nothing
    /// new was started.
    CancellingActive { search_id: u64 },
}

pub struct SearchCoordinator {
    runtime: tokio::runtime::Handle,
    settings: SearchSettings,
    active: Option<SearchTask>,
}

impl SearchCoordinator {
    pub fn new(runtime: tokio::runtime::Handle, settings: SearchSettings) -> Self {
        Self {
            runtime,
            settings,
            active: None,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn is_busy(&self) -> bool {
        self.active.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn start(&mut self, target: ScanTarget, tx: EventSender) -> StartOutcome {
        if let Some(active) = self.active.as_ref().filter(|task| !task.is_finished()) {
            active.cancel();
            return StartOutcome::CancellingActive {
                search_id: active.id(),
            };
        }

        let task = SearchTask::new(target.detect_mode());
        let search_id = task.id();
        let session = SearchSession::new(search_id, target, &task);
        let finished = task.finished.clone();
        let settings = self.settings.clone();
        let tx_for_failure = tx.clone();

        self.runtime.spawn(async move {
            let result =
                tokio::task::spawn_blocking(move || run_session(session, &settings, &tx)).await;

            if let Err(e) = result {
                tracing::error!(search_id, error = %e, "search worker aborted");
                let _ = tx_for_failure.send(
                    search_id,
                    ResultEvent::Done {
                        status: SearchStatus::Failed,
                        message: Some(format!("Search task failed: {}", e)),
                    },
                );
                finished.store(true, Ordering::Release);
            }
        });

        self.active = Some(task.clone());
        StartOutcome::Started(task)
    }

    pub fn cancel(&self) {
        if let Some(task) = &self.active {
            task.cancel();
        }
    }
}

/// Why a session stopped before reaching a normal terminal state.
#[derive(Debug)]
enum Abort {
    Failed(SearchError),
    Disconnected,
}

impl From<SearchError> for Abort {
    fn from(e: SearchError) -> Self {
        Abort::Failed(e)
    }
}

impl From<Disconnected> for Abort {
    fn from(_: Disconnected) -> Self {
        Abort::Disconnected
    }
}

/// Run-state of one session, owned by its worker.
struct SearchSession {
    search_id: u64,
    mode: ScanMode,
    target: ScanTarget,
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    files_total: usize,
    files_done: usize,
    any_match: bool,
}

impl SearchSession {
    fn new(search_id: u64, target: ScanTarget, task: &SearchTask) -> Self {
        Self {
            search_id,
            mode: task.mode,
            target,
            cancelled: task.cancelled.clone(),
            finished: task.finished.clone(),
            files_total: 0,
            files_done: 0,
            any_match: false,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn emit(&self, tx: &EventSender, event: ResultEvent) -> Result<(), Disconnected> {
        tx.send(self.search_id, event)
    }

    fn execute(
        &mut self,
        settings: &SearchSettings,
        tx: &EventSender,
    ) -> Result<SearchStatus, Abort> {
        let root = self.target.root.clone();
        if !root.is_file() && !root.is_dir() {
            return Err(SearchError::InvalidTarget(root).into());
        }

        if self.mode == ScanMode::OpenFile {
            return self.stream_file(&root, settings, tx);
        }
        if self.target.keyword.is_empty() {
            return Err(SearchError::MissingKeyword(root).into());
        }

        let filter = FileFilter::from_settings(settings);

        for _ in PathScanner::new(&root, filter.clone())? {
            if self.is_cancelled() {
                return Ok(SearchStatus::Cancelled);
            }
            self.files_total += 1;
        }
        tracing::debug!(
            search_id = self.search_id,
            files_total = self.files_total,
            "counted candidates"
        );
        self.emit(
            tx,
            ResultEvent::Progress {
                done: 0,
                total: self.files_total,
            },
        )?;

        let matcher = ContextMatcher::from_settings(&self.target.keyword, settings);
        self.scan_paths(PathScanner::new(&root, filter)?, &matcher, tx)
    }

    /// Scanning pass. The cancel flag is checked before each file is opened.
    fn scan_paths(
        &mut self,
        paths: impl IntoIterator<Item = PathBuf>,
        matcher: &ContextMatcher,
        tx: &EventSender,
    ) -> Result<SearchStatus, Abort> {
        for path in paths {
            if self.is_cancelled() {
                return Ok(SearchStatus::Cancelled);
            }

            self.scan_file(matcher, &path, tx)?;

            self.files_done += 1;
            // The tree may have grown since counting.
            self.files_total = self.files_total.max(self.files_done);
            self.emit(
                tx,
                ResultEvent::Progress {
                    done: self.files_done,
                    total: self.files_total,
                },
            )?;
        }

        if !self.any_match {
            self.emit(tx, ResultEvent::NoMatch)?;
        }
        Ok(SearchStatus::Completed)
    }

    fn scan_file(
        &mut self,
        matcher: &ContextMatcher,
        path: &Path,
        tx: &EventSender,
    ) -> Result<(), Disconnected> {
        let file = match matcher.match_file(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "failed to read file");
                return self.emit(
                    tx,
                    ResultEvent::Error {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    },
                );
            }
        };

        if !file.matched {
            return Ok(());
        }
        self.any_match = true;

        for block in &file.blocks {
            self.emit(
                tx,
                ResultEvent::FileHeader {
                    path: file.path.clone(),
                    anchor_line: block.anchor_line(),
                },
            )?;
            for (number, content) in file.block_lines(*block) {
                self.emit(
                    tx,
                    ResultEvent::Line {
                        number,
                        content: content.to_string(),
                    },
                )?;
            }
            self.emit(tx, ResultEvent::BlockEnd)?;
        }
        Ok(())
    }

    fn stream_file(
        &mut self,
        path: &Path,
        settings: &SearchSettings,
        tx: &EventSender,
    ) -> Result<SearchStatus, Abort> {
        self.files_total = 1;

        let lines = match read_lines_lossy(path) {
            Ok(lines) => lines,
            Err(e) => {
                self.emit(
                    tx,
                    ResultEvent::Error {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    },
                )?;
                return Ok(SearchStatus::Completed);
            }
        };

        let total = lines.len();
        let step = settings.open_file_progress_step.max(1);
        self.emit(tx, ResultEvent::Progress { done: 0, total })?;

        for (idx, line) in lines.into_iter().enumerate() {
            if self.is_cancelled() {
                return Ok(SearchStatus::Cancelled);
            }
            self.emit(tx, ResultEvent::RawLine(line))?;

            let done = idx + 1;
            if done % step == 0 || done == total {
                self.emit(tx, ResultEvent::Progress { done, total })?;
            }
        }

        self.files_done = 1;
        Ok(SearchStatus::Completed)
    }

    fn finish(self, status: SearchStatus, message: Option<String>, tx: &EventSender) {
        tracing::info!(
            search_id = self.search_id,
            ?status,
            files_done = self.files_done,
            files_total = self.files_total,
            "search finished"
        );
        let _ = self.emit(tx, ResultEvent::Done { status, message });
        self.finished.store(true, Ordering::Release);
    }
}

fn run_session(mut session: SearchSession, settings: &SearchSettings, tx: &EventSender) {
    tracing::info!(
        search_id = session.search_id,
        root = %session.target.root.display(),
        keyword = %session.target.keyword,
        "search started"
    );

    match session.execute(settings, tx) {
        Ok(status) => session.finish(status, None, tx),
        Err(Abort::Failed(e)) => {
            tracing::warn!(search_id = session.search_id, error = %e, "search failed");
            session.finish(SearchStatus::Failed, Some(e.to_string()), tx);
        }
        Err(Abort::Disconnected) => {
            tracing::debug!(search_id = session.search_id, "consumer went away, stopping");
            session.finished.store(true, Ordering::Release);
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/coordinator.rs"]
mod tests;
