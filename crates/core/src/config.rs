use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::settings::Settings;

const TMP_SUFFIX: &str = "tmp";

/// Load settings from a JSON file.
///
/// A missing file is not an error: defaults are returned so a first run
/// works without any setup. Fields absent from the file take their defaults.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, CoreError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }

    let data = fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&data)?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Save settings as pretty JSON.
///
/// Writes to a sibling temp file first and renames it over the target, so a
/// crash mid-write never leaves a truncated settings file.
pub fn save_settings(path: impl AsRef<Path>, settings: &Settings) -> Result<(), CoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), "saved settings");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".");
    tmp.push(TMP_SUFFIX);
    PathBuf::from(tmp)
}
