//! Process-wide settings for filename generation.
//!
//! Settings are read from a TOML file and then overridden by `DOCFILE_*`
//! environment variables:
//! ```toml
//! filename_format = "{{ created_year }}/{{ correspondent }}/{{ title }}"
//! filename_format_remove_none = true
//! originals_dir = "media/documents/originals"
//! archive_dir = "media/documents/archive"
//! time_zone = "Europe/Berlin"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::zone::LocalZone;

pub const ENV_FILENAME_FORMAT: &str = "DOCFILE_FILENAME_FORMAT";
pub const ENV_FILENAME_FORMAT_REMOVE_NONE: &str = "DOCFILE_FILENAME_FORMAT_REMOVE_NONE";
pub const ENV_ORIGINALS_DIR: &str = "DOCFILE_ORIGINALS_DIR";
pub const ENV_ARCHIVE_DIR: &str = "DOCFILE_ARCHIVE_DIR";
pub const ENV_TIME_ZONE: &str = "DOCFILE_TIME_ZONE";

const DEFAULT_ORIGINALS_DIR: &str = "media/documents/originals";
const DEFAULT_ARCHIVE_DIR: &str = "media/documents/archive";

/// Validated settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Global filename template; `None` stores documents by id.
    pub filename_format: Option<String>,
    /// Collapse `-none-` sentinels instead of writing them as `none`.
    pub filename_format_remove_none: bool,
    /// Root directory of original files.
    pub originals_dir: PathBuf,
    /// Root directory of archived (PDF) copies.
    pub archive_dir: PathBuf,
    /// Zone used to turn UTC timestamps into local calendar dates.
    pub time_zone: LocalZone,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            filename_format: None,
            filename_format_remove_none: false,
            originals_dir: PathBuf::from(DEFAULT_ORIGINALS_DIR),
            archive_dir: PathBuf::from(DEFAULT_ARCHIVE_DIR),
            time_zone: LocalZone::default(),
        }
    }
}

/// Settings as written in the config file, before validation.
/// Every field is optional so a partial file is fine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    pub filename_format: Option<String>,
    pub filename_format_remove_none: Option<bool>,
    pub originals_dir: Option<PathBuf>,
    pub archive_dir: Option<PathBuf>,
    pub time_zone: Option<String>,
}

impl RawSettings {
    /// Parse the TOML config format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on malformed TOML or unknown keys.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Override fields from `DOCFILE_*` variables resolved by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if a boolean variable does not parse.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup(ENV_FILENAME_FORMAT) {
            self.filename_format = Some(format);
        }
        if let Some(value) = lookup(ENV_FILENAME_FORMAT_REMOVE_NONE) {
            let flag = parse_bool(&value).ok_or_else(|| ConfigError::InvalidEnv {
                variable: ENV_FILENAME_FORMAT_REMOVE_NONE.to_string(),
                value: value.clone(),
            })?;
            self.filename_format_remove_none = Some(flag);
        }
        if let Some(dir) = lookup(ENV_ORIGINALS_DIR) {
            self.originals_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup(ENV_ARCHIVE_DIR) {
            self.archive_dir = Some(PathBuf::from(dir));
        }
        if let Some(zone) = lookup(ENV_TIME_ZONE) {
            self.time_zone = Some(zone);
        }
        Ok(())
    }
}

impl Settings {
    /// Load settings from `path` (skipped when the file does not exist) and
    /// apply the process environment on top.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or a value is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut raw = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            RawSettings::from_toml(&content)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            RawSettings::default()
        };
        raw.apply_env(|key| std::env::var(key).ok())?;
        Self::from_raw(raw)
    }

    /// Validate raw settings, filling defaults for absent fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeZone`] if `time_zone` does not parse.
    pub fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let time_zone = match raw.time_zone.as_deref() {
            Some(zone) => zone.parse()?,
            None => LocalZone::default(),
        };
        Ok(Self {
            filename_format: raw.filename_format,
            filename_format_remove_none: raw.filename_format_remove_none.unwrap_or(false),
            originals_dir: raw
                .originals_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ORIGINALS_DIR)),
            archive_dir: raw
                .archive_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_DIR)),
            time_zone,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
