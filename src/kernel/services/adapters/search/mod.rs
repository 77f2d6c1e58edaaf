//! Log search engine.
//!
//! - FileFilter: which file names are candidates
//! - PathScanner: lazy enumeration of candidate files under a root
//! - ContextMatcher: per-file matching and context-window merging
//! - EventChannel: ordered worker-to-consumer conduit
//! - SearchCoordinator: cancellable background sessions

mod channel;
mod coordinator;
mod filter;
mod matcher;
mod scanner;

pub use channel::{event_channel, Disconnected, EventReceiver, EventSender};
pub use coordinator::{SearchCoordinator, SearchTask, StartOutcome};
pub use filter::FileFilter;
pub use matcher::{merge_windows, read_lines_lossy, ContextMatcher};
pub use scanner::PathScanner;
