//! Service ports: data contracts shared by the engine and its consumers.

pub mod search;
pub mod settings;

pub use search::{
    clean_dropped_path, FileMatches, MatchWindow, MergedBlock, ResultEvent, Result, SaveError,
    ScanMode, ScanTarget, SearchError, SearchMessage, SearchStatus,
};
pub use settings::SearchSettings;
