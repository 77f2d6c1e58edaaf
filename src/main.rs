mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use logsift::kernel::services::adapters::{
    ensure_settings_file, event_channel, load_settings, EventReceiver, SearchCoordinator,
    StartOutcome,
};
use logsift::kernel::services::ports::{clean_dropped_path, ScanTarget, SearchStatus};
use logsift::kernel::SearchState;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "logsift",
    version,
    about = "Search a log file or a folder of logs for a keyword and show each hit with context"
)]
struct Cli {
    /// Log file or folder to search
    root: Option<String>,
    /// Keyword (case-insensitive). Omit it with a single file to print the whole file
    keyword: Option<String>,
    /// Save the assembled output to this file
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
    /// Locate a query inside the assembled output
    #[arg(long, value_name = "QUERY")]
    find: Option<String>,
    /// Settings file (JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write the default settings file if it does not exist
    #[arg(long)]
    init_config: bool,
    #[arg(long, value_name = "N")]
    context_lines: Option<usize>,
    #[arg(long, value_name = "N")]
    merge_gap: Option<usize>,
    /// No progress on stderr
    #[arg(short, long)]
    quiet: bool,
    /// Mirror the log to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logging = logging::init(cli.verbose);
    if let (true, Some(guard)) = (cli.verbose, logging.as_ref()) {
        eprintln!("logs: {}", guard.log_dir().display());
    }

    match run(cli) {
        Ok(None) | Ok(Some(SearchStatus::Completed)) => ExitCode::SUCCESS,
        Ok(Some(SearchStatus::Cancelled)) => ExitCode::from(130),
        Ok(Some(SearchStatus::Failed)) => ExitCode::from(2),
        Err(e) => {
            let message = format!("{e:#}");
            tracing::error!(error = %message, "logsift failed");
            eprintln!("logsift: {message}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<Option<SearchStatus>> {
    if cli.init_config {
        let path = ensure_settings_file().context("cannot write default settings")?;
        eprintln!("settings: {}", path.display());
        if cli.root.is_none() {
            return Ok(None);
        }
    }

    let Some(raw_root) = cli.root.as_deref() else {
        bail!("missing <ROOT>: drop a log file or folder on the command line");
    };

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(n) = cli.context_lines {
        settings.context_lines = n;
    }
    if let Some(n) = cli.merge_gap {
        settings.merge_gap = n;
    }
    let poll_interval = Duration::from_millis(settings.poll_interval_ms.max(1));

    let cwd = std::env::current_dir().context("cannot read current directory")?;
    let target = resolve_target(&cwd, raw_root, cli.keyword.as_deref().unwrap_or(""));

    let runtime = build_runtime().context("cannot start worker runtime")?;
    let interrupted = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, interrupted.clone())
        .context("cannot install Ctrl-C handler")?;

    let mut coordinator = SearchCoordinator::new(runtime.handle().clone(), settings);
    let (tx, rx) = event_channel();
    let task = match coordinator.start(target, tx) {
        StartOutcome::Started(task) => task,
        StartOutcome::CancellingActive { search_id } => {
            bail!("search {search_id} is still running")
        }
    };

    let mut state = SearchState::default();
    state.begin_search(task.id(), task.mode());
    let status = drive(
        &mut state,
        &coordinator,
        &rx,
        &interrupted,
        poll_interval,
        cli.quiet,
    );

    io::stdout()
        .lock()
        .write_all(state.text().as_bytes())
        .context("cannot write results")?;

    if let Some(query) = cli.find.as_deref() {
        report_find(&mut state, query);
    }

    if let Some(path) = cli.save.as_deref() {
        state.save_to(path)?;
        eprintln!("saved results to {}", path.display());
    }

    Ok(Some(status))
}

/// Resolves the dropped/typed root against `cwd` and trims the keyword.
fn resolve_target(cwd: &Path, raw_root: &str, keyword: &str) -> ScanTarget {
    let root = clean_dropped_path(raw_root);
    let root = if root.is_absolute() {
        root
    } else {
        cwd.join(root)
    };
    ScanTarget::new(root, keyword.trim())
}

fn build_runtime() -> io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .or_else(|e| {
            tracing::error!(
                error = %e,
                "Failed to create multi-thread tokio runtime, falling back to current-thread"
            );
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
        })
}

/// Foreground loop: poll, apply in order, report status changes.
fn drive(
    state: &mut SearchState,
    coordinator: &SearchCoordinator,
    rx: &EventReceiver,
    interrupted: &AtomicBool,
    poll_interval: Duration,
    quiet: bool,
) -> SearchStatus {
    let mut cancel_sent = false;
    let mut last_status = String::new();

    loop {
        if !cancel_sent && interrupted.load(Ordering::Relaxed) {
            coordinator.cancel();
            cancel_sent = true;
        }

        std::thread::sleep(poll_interval);
        let worker_idle = !coordinator.is_busy();
        for msg in rx.drain() {
            state.apply_message(msg);
        }

        if !quiet {
            let status = state.status_message();
            if status != last_status {
                eprintln!("{status}");
                last_status = status;
            }
        }

        if let Some(status) = state.outcome() {
            return status;
        }
        // Idle was read before draining, so a Done would already be applied.
        if worker_idle {
            tracing::error!("search worker stopped without a final status");
            return SearchStatus::Failed;
        }
    }
}

fn report_find(state: &mut SearchState, query: &str) {
    state.set_find_query(query);
    let total = state.find().len();
    if total == 0 {
        eprintln!("find {query:?}: {}", state.find().position_label());
        return;
    }

    for _ in 0..total {
        if let Some(span) = state.find().current() {
            eprintln!(
                "{}: line {}",
                state.find().position_label(),
                state.line_of_offset(span.start)
            );
        }
        state.find_next();
    }
}

#[cfg(test)]
#[path = "../tests/unit/cli_startup_paths.rs"]
mod tests;
