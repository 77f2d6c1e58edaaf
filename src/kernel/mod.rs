//! Headless search core: the background engine plus the foreground state
//! that consumes its events.

pub mod find;
pub mod search;
pub mod services;

pub use find::{MatchIndex, MatchSpan};
pub use search::{ProgressUnit, SearchPhase, SearchState};
