//! Once-a-day check for a newer release.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{GitUtilsError, Result};

/// Version of the running binary
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `owner/repo` whose releases are polled
pub const RELEASE_REPO: &str = "arzkar/git-utils";

/// Where users are pointed when a newer release exists
pub const INSTALL_URL: &str = "https://github.com/arzkar/git-utils#installation";

/// How two version strings are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionComparison {
    /// Plain string ordering, so `9.0.0` sorts after `10.0.0`
    #[default]
    Lexical,
    /// semver ordering, falling back to lexical when either side fails to parse
    Semantic,
}

/// Compare two versions after stripping a leading `v`
pub fn compare_versions(a: &str, b: &str, mode: VersionComparison) -> Ordering {
    let a = a.trim().trim_start_matches('v');
    let b = b.trim().trim_start_matches('v');
    match mode {
        VersionComparison::Lexical => a.cmp(b),
        VersionComparison::Semantic => {
            match (semver::Version::parse(a), semver::Version::parse(b)) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
    }
}

/// Anything that can report the latest released tag
pub trait ReleaseSource {
    fn latest_tag(&self) -> Result<String>;
}

/// GitHub "latest release" endpoint
pub struct GithubReleases {
    url: String,
}

impl GithubReleases {
    pub fn new(repo: &str) -> Self {
        GithubReleases {
            url: format!("https://api.github.com/repos/{}/releases/latest", repo),
        }
    }
}

impl Default for GithubReleases {
    fn default() -> Self {
        Self::new(RELEASE_REPO)
    }
}

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

impl ReleaseSource for GithubReleases {
    fn latest_tag(&self) -> Result<String> {
        let response = ureq::get(&self.url)
            .set("User-Agent", "git-utils-update-checker")
            .set("Accept", "application/vnd.github.v3+json")
            .timeout(std::time::Duration::from_secs(5))
            .call()
            .map_err(|e| GitUtilsError::update(format!("failed to fetch release info: {}", e)))?;

        let release: Release = response
            .into_json()
            .map_err(|e| GitUtilsError::update(format!("failed to parse release info: {}", e)))?;
        Ok(release.tag_name)
    }
}

/// Result of an update check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Within the check interval; answered from the cache
    Cached { latest: String, newer: bool },
    /// The release endpoint was queried
    Fetched { latest: String, newer: bool },
    /// The query failed; the cache was left untouched
    Unavailable(String),
}

impl UpdateStatus {
    /// The newer release, if one is known
    pub fn newer_release(&self) -> Option<&str> {
        match self {
            UpdateStatus::Cached { latest, newer: true }
            | UpdateStatus::Fetched { latest, newer: true } => Some(latest),
            _ => None,
        }
    }
}

pub struct UpdateChecker {
    current: String,
    interval: Duration,
    comparison: VersionComparison,
}

impl UpdateChecker {
    pub fn new(current: impl Into<String>, comparison: VersionComparison) -> Self {
        UpdateChecker {
            current: current.into(),
            interval: Duration::hours(24),
            comparison,
        }
    }

    fn is_newer(&self, latest: &str) -> bool {
        !latest.is_empty() && compare_versions(latest, &self.current, self.comparison) == Ordering::Greater
    }

    /// Check for a newer release, querying `source` only when the cache is stale.
    ///
    /// After a successful query `config.version` and `config.last_updated` are
    /// updated regardless of the comparison; the caller persists the config.
    pub fn check(
        &self,
        config: &mut AppConfig,
        source: &dyn ReleaseSource,
        now: DateTime<Utc>,
    ) -> UpdateStatus {
        if let Some(last) = config.last_updated {
            let age = now.signed_duration_since(last);
            // a timestamp in the future counts as stale
            if age >= Duration::zero() && age < self.interval {
                debug!("update check cached at {}", last);
                return UpdateStatus::Cached {
                    latest: config.version.clone(),
                    newer: self.is_newer(&config.version),
                };
            }
        }

        match source.latest_tag() {
            Ok(latest) => {
                let newer = self.is_newer(&latest);
                config.version = latest.clone();
                config.last_updated = Some(now);
                UpdateStatus::Fetched { latest, newer }
            }
            Err(e) => {
                warn!("{}", e);
                UpdateStatus::Unavailable(e.to_string())
            }
        }
    }
}
