//! Tracer configuration
//!
//! Configuration can be given in code or loaded from a file in one of
//! several formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)
//!
//! Files carry a partial update: only the fields present (and non-empty)
//! overwrite the running configuration.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::*;
use crate::error::{Error, Result};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Complete tracer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Namespace label, names the trace directory
    pub label: String,
    /// Tag written after the timestamp of every entry (omitted when empty)
    pub user_tag: String,
    /// Size in bytes past which the active file is rotated
    pub max_size: u64,
    /// Max number of log files kept in the trace directory
    pub max_files: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            user_tag: String::new(),
            max_size: DEFAULT_MAX_SIZE,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl TraceConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_user_tag(mut self, user_tag: impl Into<String>) -> Self {
        self.user_tag = user_tag.into();
        self
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Merge a partial update. Empty strings and zero limits are treated as
    /// "not given" and leave the current value in place.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(label) = update.label.as_deref().filter(|s| !s.is_empty()) {
            self.label = label.to_string();
        }
        if let Some(tag) = update.user_tag.as_deref().filter(|s| !s.is_empty()) {
            self.user_tag = tag.to_string();
        }
        if let Some(size) = update.max_size.filter(|&n| n > 0) {
            self.max_size = size;
        }
        if let Some(files) = update.max_files.filter(|&n| n > 0) {
            self.max_files = files;
        }
    }

    /// Reject values the tracer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.label.is_empty() {
            return Err(Error::config("label must not be empty"));
        }
        if self.label.contains(['/', '\\']) {
            return Err(Error::config(format!(
                "label must not contain path separators: {}",
                self.label
            )));
        }
        if self.max_size == 0 {
            return Err(Error::config("max_size must be greater than zero"));
        }
        if self.max_files == 0 {
            return Err(Error::config("max_files must be at least 1"));
        }
        Ok(())
    }
}

/// Partial configuration, as given by a caller or a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigUpdate {
    pub label: Option<String>,
    pub user_tag: Option<String>,
    pub max_size: Option<u64>,
    pub max_files: Option<usize>,
}

impl From<TraceConfig> for ConfigUpdate {
    fn from(config: TraceConfig) -> Self {
        Self {
            label: Some(config.label),
            user_tag: Some(config.user_tag),
            max_size: Some(config.max_size),
            max_files: Some(config.max_files),
        }
    }
}

impl ConfigUpdate {
    /// Load an update from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::ConfigError(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let update: Self = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(update)
    }

    /// Find and load a config file from `dir`
    pub fn find_and_load(dir: &Path) -> Result<(Self, PathBuf)> {
        for name in CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                let update = Self::load(&path)?;
                return Ok((update, path));
            }
        }
        Err(Error::ConfigError(format!(
            "No config file found in {}. Expected one of: {:?}",
            dir.display(),
            CONFIG_FILES
        )))
    }
}

/// Configuration shared by every caller of one tracer.
///
/// Reads hand out a snapshot, so a caller never observes a half-applied
/// update; writers are last-writer-wins.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<TraceConfig>>,
}

impl SharedConfig {
    pub fn new(config: TraceConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current configuration
    pub fn snapshot(&self) -> TraceConfig {
        self.inner.read().clone()
    }

    pub fn update(&self, update: &ConfigUpdate) {
        self.inner.write().apply(update);
    }

    /// Replace the user tag, including clearing it
    pub fn set_user_tag(&self, user_tag: impl Into<String>) {
        self.inner.write().user_tag = user_tag.into();
    }
}
