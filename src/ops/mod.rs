//! Operators that run across every repository below a directory.
//!
//! Each operator walks the tree with [crate::locator], runs its git commands
//! per repository and records per-repository failures in a [WalkSummary]
//! instead of aborting. Only an unreadable root ends a walk early.
//! [grep] is the exception: it reads every file below the root directly
//! and stops when a line overflows its buffer.

pub mod checkout;
pub mod fetch;
pub mod grep;
pub mod pull;
pub mod standup;

pub use checkout::{checkout, BranchPicker};
pub use fetch::fetch;
pub use grep::{grep, GrepOptions, GrepReport};
pub use pull::{pull, PullOptions, PullOutcome};
pub use standup::{standup, CommitDigest};

use std::path::Path;

use tracing::debug;

use crate::error::{GitUtilsError, Result};
use crate::locator::locate_repositories;
use crate::report::WalkSummary;

/// Which branches a fetch or pull applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchTarget {
    All,
    Branches(Vec<String>),
}

impl BranchTarget {
    /// Parse `all` or a comma-separated branch list.
    ///
    /// Entries are trimmed and empty entries dropped; a list with nothing
    /// left is an error.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim() == "all" {
            return Ok(BranchTarget::All);
        }
        let branches: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect();
        if branches.is_empty() {
            return Err(GitUtilsError::config(format!(
                "no branch names in '{}'",
                raw
            )));
        }
        Ok(BranchTarget::Branches(branches))
    }
}

/// Visit every repository under `root` in walk order.
///
/// `visit` records its own per-repository failures; an `Err` from it ends
/// the walk.
pub(crate) fn walk<F>(root: &Path, mut visit: F) -> Result<WalkSummary>
where
    F: FnMut(&Path, &mut WalkSummary) -> Result<()>,
{
    let mut summary = WalkSummary::default();
    for repo in locate_repositories(root)? {
        debug!("visiting {}", repo.display());
        summary.visited += 1;
        visit(&repo, &mut summary)?;
    }
    Ok(summary)
}
