use std::fmt;
use std::path::PathBuf;

/// A per-repository failure during a walk.
///
/// These are non-fatal: the walk reports them and moves on.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoFailure {
    pub repo: PathBuf,
    pub branch: Option<String>,
    pub reason: String,
}

impl fmt::Display for RepoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => write!(
                f,
                "Error in repository '{}' (branch '{}'): {}",
                self.repo.display(),
                branch,
                self.reason
            ),
            None => write!(
                f,
                "Error in repository '{}': {}",
                self.repo.display(),
                self.reason
            ),
        }
    }
}

/// Outcome of running an operator over every located repository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkSummary {
    /// Number of repositories the walk reached
    pub visited: usize,
    pub failures: Vec<RepoFailure>,
}

impl WalkSummary {
    pub fn record_failure(
        &mut self,
        repo: impl Into<PathBuf>,
        branch: Option<&str>,
        reason: impl fmt::Display,
    ) -> &RepoFailure {
        self.failures.push(RepoFailure {
            repo: repo.into(),
            branch: branch.map(str::to_string),
            reason: reason.to_string(),
        });
        &self.failures[self.failures.len() - 1]
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for WalkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.visited == 1 { "repository" } else { "repositories" };
        if self.failures.is_empty() {
            write!(f, "{} {} processed", self.visited, plural)
        } else {
            write!(
                f,
                "{} {} processed, {} failure(s)",
                self.visited,
                plural,
                self.failures.len()
            )
        }
    }
}
