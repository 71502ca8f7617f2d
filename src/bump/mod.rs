//! Version bumping driven by `.git-utils-bump.cfg`
//!
//! The pipeline is linear:
//! 1. load the config and refuse to run on a dirty working tree
//! 2. compute the new version
//! 3. stage every file rewrite in memory and verify all search patterns
//! 4. write the files, `git add` each one
//! 5. persist the new version and stage the config
//! 6. optionally commit
//! 7. optionally create an annotated tag
//!
//! Nothing touches disk before step 4. A failure from step 4 on is reported
//! but earlier writes are not rolled back.

pub mod config;
pub mod rewrite;

pub use config::{BumpConfig, FileRule, BUMP_CONFIG_FILE};
pub use rewrite::RewritePlan;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::{VersionBump, VersionString};
use crate::error::{GitUtilsError, Result};
use crate::git::Git;

/// What a bump changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpReport {
    pub old_version: String,
    pub new_version: String,
    /// Rewritten files, in rule order
    pub files: Vec<PathBuf>,
    pub committed: bool,
    pub tag: Option<String>,
}

impl BumpReport {
    /// `Bump version: <old> → <new>`, also used as the commit message
    pub fn summary(&self) -> String {
        commit_message(&self.old_version, &self.new_version)
    }
}

fn commit_message(old: &str, new: &str) -> String {
    format!("Bump version: {} → {}", old, new)
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| GitUtilsError::config(format!("non UTF-8 path: {}", path.display())))
}

/// Bump the version of the repository at `root`.
pub fn bump(git: &dyn Git, root: &Path, bump_type: VersionBump) -> Result<BumpReport> {
    let mut config = BumpConfig::load(&root.join(BUMP_CONFIG_FILE))?;

    if git.is_dirty(root)? {
        return Err(GitUtilsError::DirtyWorkingTree);
    }

    let old_version = config.current_version.clone();
    let new_version = VersionString::parse(&old_version)?
        .bump(bump_type)?
        .to_string();
    info!("bumping {} -> {}", old_version, new_version);

    let plan = RewritePlan::prepare(config.root(), &config.files, &old_version, &new_version)?;

    let files = plan.apply(|path| {
        git.run_checked(root, &["add", path_arg(path)?])?;
        Ok(())
    })?;

    config.current_version = new_version.clone();
    config.save()?;
    git.run_checked(root, &["add", path_arg(config.path())?])?;

    if config.commit {
        let message = commit_message(&old_version, &new_version);
        git.run_checked(root, &["commit", "-m", &message])?;
    }

    let tag = if config.tag {
        let name = config.tag_name(&new_version);
        let message = format!("Version {}", new_version);
        git.run_checked(root, &["tag", "-a", &name, "-m", &message])?;
        Some(name)
    } else {
        None
    };

    Ok(BumpReport {
        old_version,
        new_version,
        files,
        committed: config.commit,
        tag,
    })
}
