use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::git::{output_lines, Git};
use crate::ops::{walk, BranchTarget};
use crate::report::WalkSummary;
use crate::ui;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullOptions {
    /// Fetch and show the diff stat only
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// The remote branch has nothing the local one lacks
    NoChanges,
    /// Dry run: the diff stat that a pull would apply
    Previewed(String),
    /// Fast-forwarded; carries the applied diff stat
    Pulled(String),
}

/// Local branch names, as `git branch` lists them
pub fn local_branches(git: &dyn Git, repo: &Path) -> Result<Vec<String>> {
    let stdout = git.run_checked(repo, &["branch", "--format", "%(refname:short)"])?;
    Ok(output_lines(&stdout))
}

/// The checked-out branch, or `None` when HEAD is detached or unborn
pub fn current_branch(git: &dyn Git, repo: &Path) -> Option<String> {
    match git.run_checked(repo, &["rev-parse", "--abbrev-ref", "HEAD"]) {
        Ok(name) if !name.is_empty() && name != "HEAD" => Some(name),
        Ok(_) => None,
        Err(err) => {
            debug!("no current branch in {}: {}", repo.display(), err);
            None
        }
    }
}

/// Fetch `branch`, preview what it would bring in, and fast-forward it.
///
/// The checked-out branch is pulled with `--ff-only`; any other branch is
/// updated through `fetch origin <branch>:<branch>` so HEAD is never merged.
pub fn pull_branch(
    git: &dyn Git,
    repo: &Path,
    branch: &str,
    current: Option<&str>,
    options: PullOptions,
) -> Result<PullOutcome> {
    git.run_checked(repo, &["fetch", "origin", branch])?;

    let range = format!("{}..origin/{}", branch, branch);
    let stat = git.run_checked(repo, &["diff", "--stat", &range])?;
    if stat.is_empty() {
        return Ok(PullOutcome::NoChanges);
    }
    if options.dry_run {
        return Ok(PullOutcome::Previewed(stat));
    }

    if current == Some(branch) {
        git.run_checked(repo, &["pull", "--ff-only", "origin", branch])?;
    } else {
        let refspec = format!("{}:{}", branch, branch);
        git.run_checked(repo, &["fetch", "origin", &refspec])?;
    }
    Ok(PullOutcome::Pulled(stat))
}

fn report(repo: &Path, branch: &str, outcome: &PullOutcome) {
    match outcome {
        PullOutcome::NoChanges => ui::display_status(&format!(
            "{}: no changes on '{}'",
            repo.display(),
            branch
        )),
        PullOutcome::Previewed(stat) => {
            ui::display_status(&format!(
                "{}: '{}' would change (dry run)",
                repo.display(),
                branch
            ));
            println!("{}", ui::colorize_diff_stat(stat));
        }
        PullOutcome::Pulled(stat) => {
            println!("{}", ui::colorize_diff_stat(stat));
            ui::display_success(&format!("{}: pulled '{}'", repo.display(), branch));
        }
    }
}

/// Pull `target` in every repository under `root`.
pub fn pull(
    git: &dyn Git,
    root: &Path,
    target: &BranchTarget,
    options: PullOptions,
) -> Result<WalkSummary> {
    walk(root, |repo, summary| {
        let branches = match target {
            BranchTarget::All => match local_branches(git, repo) {
                Ok(branches) => branches,
                Err(err) => {
                    ui::display_failure(summary.record_failure(repo, None, err));
                    return Ok(());
                }
            },
            BranchTarget::Branches(branches) => branches.clone(),
        };

        let current = current_branch(git, repo);
        for branch in &branches {
            match pull_branch(git, repo, branch, current.as_deref(), options) {
                Ok(outcome) => report(repo, branch, &outcome),
                Err(err) => ui::display_failure(summary.record_failure(repo, Some(branch.as_str()), err)),
            }
        }
        Ok(())
    })
}
