//! Configuration store for hook behavior
//!
//! Hooks read their gate flags and URLs through the [`Settings`] trait so the
//! same router runs against a host-provided store or the bundled YAML file.
//! Flags are looked up fresh on every event; a flipped flag applies to the
//! next dispatch without a restart.
//!
//! The file layout is two levels deep: a section per subsystem (the issue
//! tracker's name, `host`, `gitweb`) holding scalar keys:
//!
//! ```yaml
//! host:
//!   canonical_web_url: https://review.example/
//! gitweb:
//!   url: gitweb
//!   revision_template: "?p={project};a=commit;h={commit}"
//! jira:
//!   issue_pattern: "[A-Z][A-Z0-9]+-[0-9]+"
//!   comment_on_ref_update: true
//!   set_topic_from_ticket: false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading or saving the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file does not exist
    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Read-only lookup of hook configuration.
///
/// `section` is the owning subsystem: gate flags live under the issue
/// tracker's name (see `ItsFacade::name`), the canonical base URL under
/// `host`, browser settings under `gitweb`.
pub trait Settings: Send + Sync {
    /// Look up a boolean flag, falling back to `default` when the key is
    /// absent or not a boolean.
    fn flag(&self, section: &str, key: &str, default: bool) -> bool;

    /// Look up a string value. Absent keys and non-string values are `None`.
    fn string(&self, section: &str, key: &str) -> Option<String>;
}

/// Settings backed by a YAML file (~/.config/tracklink/config.yaml).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(flatten)]
    sections: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl FileSettings {
    /// Create an empty settings document
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from the default path (~/.config/tracklink/config.yaml)
    pub fn load_default() -> Result<Self, SettingsError> {
        Self::load(Self::default_path())
    }

    /// Load settings from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SettingsError::NotFound(path.to_path_buf()));
        }

        tracing::info!(path = %path.display(), "Loading TrackLink configuration");

        let content = fs::read_to_string(path)?;
        let settings: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            sections = settings.sections.len(),
            "Configuration loaded successfully"
        );

        Ok(settings)
    }

    /// Save settings to a specific path, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving TrackLink configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/tracklink/config.yaml)
    pub fn default_path() -> PathBuf {
        // Always use ~/.config for consistency across platforms (macOS, Linux)
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("tracklink");
        path.push("config.yaml");
        path
    }

    /// Set a value in a section (used when building a file programmatically)
    pub fn set(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: serde_yaml::Value,
    ) {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key.into(), value);
    }

    fn value(&self, section: &str, key: &str) -> Option<&serde_yaml::Value> {
        self.sections.get(section)?.get(key)
    }
}

impl Settings for FileSettings {
    fn flag(&self, section: &str, key: &str, default: bool) -> bool {
        match self.value(section, key) {
            Some(value) => value.as_bool().unwrap_or_else(|| {
                tracing::warn!(
                    section = section,
                    key = key,
                    "Flag is not a boolean; using default"
                );
                default
            }),
            None => default,
        }
    }

    fn string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

/// In-memory settings for tests and embedding hosts that manage their own
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    flags: HashMap<(String, String), bool>,
    strings: HashMap<(String, String), String>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(
        mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: bool,
    ) -> Self {
        self.flags.insert((section.into(), key.into()), value);
        self
    }

    pub fn with_string(
        mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.strings.insert((section.into(), key.into()), value.into());
        self
    }
}

impl Settings for StaticSettings {
    fn flag(&self, section: &str, key: &str, default: bool) -> bool {
        self.flags
            .get(&(section.to_string(), key.to_string()))
            .copied()
            .unwrap_or(default)
    }

    fn string(&self, section: &str, key: &str) -> Option<String> {
        self.strings
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }
}
