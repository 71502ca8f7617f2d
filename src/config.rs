use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GitUtilsError, Result};
use crate::update::VersionComparison;

/// Environment variable that overrides the application directory
pub const HOME_ENV: &str = "GIT_UTILS_HOME";

const CONFIG_FILE: &str = "config.json";

/// Per-user application configuration stored as JSON.
///
/// Holds the tag message templates used by `tag` and the update-check cache.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub tags: TagsConfig,

    /// Last release version seen by the update checker
    #[serde(default)]
    pub version: String,

    /// When the update checker last queried the release endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub update_check: UpdateCheckConfig,
}

/// Named message templates for annotated tags
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct TagsConfig {
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

/// Controls the daily release check
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UpdateCheckConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub comparison: VersionComparison,
}

impl Default for UpdateCheckConfig {
    fn default() -> Self {
        UpdateCheckConfig {
            enabled: true,
            comparison: VersionComparison::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config at `path`, creating a default one if missing.
    ///
    /// # Returns
    /// * `Ok(AppConfig)` - Loaded or freshly created configuration
    /// * `Err` - If the file exists but cannot be read or parsed, or cannot be created
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = AppConfig::default();
            config.save(path)?;
            info!("created default config at {}", path.display());
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes the config to a sibling temp file, then renames it into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Looks up a tag message template by key.
    pub fn tag_message(&self, key: &str) -> Option<&str> {
        self.tags.messages.get(key).map(String::as_str)
    }
}

/// Locations of the per-user application files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub dir: PathBuf,
}

impl AppPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        AppPaths { dir: dir.into() }
    }

    /// Resolve the application directory.
    ///
    /// Uses `$GIT_UTILS_HOME` when set, otherwise `<config dir>/git-utils`.
    pub fn resolve() -> Result<Self> {
        if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(AppPaths::new(dir));
        }
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| GitUtilsError::config("cannot determine the user's config directory"))?;
        Ok(AppPaths::new(base.join("git-utils")))
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }
}
