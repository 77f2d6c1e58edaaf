//! Service adapters: filesystem and runtime specific implementations.

pub mod paths;
pub mod search;
pub mod settings;

pub use paths::{ensure_log_dir, get_log_dir};
pub use search::{
    event_channel, ContextMatcher, EventReceiver, EventSender, FileFilter, PathScanner,
    SearchCoordinator, SearchTask, StartOutcome,
};
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, read_settings,
    write_default_settings, SettingsError,
};
