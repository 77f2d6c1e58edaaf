use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Lines of context on each side of a matching line.
    pub context_lines: usize,
    /// Windows starting within this many lines of the previous block's end
    /// are merged into it.
    pub merge_gap: usize,
    pub extensions: Vec<String>,
    pub name_prefixes: Vec<String>,
    pub file_names: Vec<String>,
    pub poll_interval_ms: u64,
    pub open_file_progress_step: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            context_lines: 5,
            merge_gap: 5,
            extensions: vec![
                ".log".to_string(),
                ".txt".to_string(),
                ".syslog".to_string(),
                ".logcat".to_string(),
            ],
            name_prefixes: vec!["logcat.".to_string()],
            file_names: vec!["logcat".to_string()],
            poll_interval_ms: 50,
            open_file_progress_step: 500,
        }
    }
}
