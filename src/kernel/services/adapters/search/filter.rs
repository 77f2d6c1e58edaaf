//! Decides which file names belong to the log corpus.

use crate::kernel::services::ports::SearchSettings;

#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    prefixes: Vec<String>,
    names: Vec<String>,
}

impl FileFilter {
    pub fn new(extensions: &[String], prefixes: &[String], names: &[String]) -> Self {
        let fold = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            extensions: fold(extensions),
            prefixes: fold(prefixes),
            names: fold(names),
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self::new(
            &settings.extensions,
            &settings.name_prefixes,
            &settings.file_names,
        )
    }

    pub fn accepts(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
            || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.names.iter().any(|n| name == *n)
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::from_settings(&SearchSettings::default())
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/filter.rs"]
mod tests;
