use super::paths::{get_cache_dir, APP_NAME};
use crate::kernel::services::ports::settings::SearchSettings;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot determine settings directory")]
    NoSettingsDir,
    #[error("Failed to read settings {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(APP_NAME).join(SETTINGS_FILE))
}

pub fn ensure_settings_file() -> Result<PathBuf, SettingsError> {
    let path = get_settings_path().ok_or(SettingsError::NoSettingsDir)?;
    write_default_settings(&path)?;
    Ok(path)
}

/// Writes the defaults to `path` unless a file is already there.
pub fn write_default_settings(path: &Path) -> Result<(), SettingsError> {
    if path.exists() {
        return Ok(());
    }
    let io_err = |source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let content = serde_json::to_string_pretty(&SearchSettings::default()).map_err(|source| {
        SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    std::fs::write(path, content).map_err(io_err)
}

pub fn read_settings(path: &Path) -> Result<SearchSettings, SettingsError> {
    let data = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// An explicit path must load. The per-user file is optional and a broken
/// one falls back to defaults.
pub fn load_settings(explicit: Option<&Path>) -> Result<SearchSettings, SettingsError> {
    if let Some(path) = explicit {
        return read_settings(path);
    }

    let Some(path) = get_settings_path().filter(|p| p.exists()) else {
        return Ok(SearchSettings::default());
    };

    match read_settings(&path) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring settings file");
            Ok(SearchSettings::default())
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
