use std::path::Path;

use crate::error::{GitUtilsError, Result};
use crate::git::{output_lines, Git};
use crate::ops::walk;
use crate::report::WalkSummary;
use crate::ui;

const REMOTE_PREFIX: &str = "origin/";

/// Chooses one branch out of several candidates
pub trait BranchPicker {
    /// Returns a 0-based index into `branches`
    fn pick(&mut self, repo: &Path, branches: &[String]) -> Result<usize>;
}

/// Remote branches on `origin` starting with `prefix`, without the `origin/` part
pub fn matching_remote_branches(git: &dyn Git, repo: &Path, prefix: &str) -> Result<Vec<String>> {
    let pattern = format!("{}{}*", REMOTE_PREFIX, prefix);
    let stdout = git.run_checked(repo, &["branch", "-r", "--list", &pattern])?;
    Ok(output_lines(&stdout)
        .into_iter()
        .filter(|line| !line.contains("->"))
        .map(|line| {
            line.strip_prefix(REMOTE_PREFIX)
                .map(str::to_string)
                .unwrap_or(line)
        })
        .collect())
}

/// Switch to `name`, creating a tracking branch when none exists locally
pub fn checkout_branch(git: &dyn Git, repo: &Path, name: &str) -> Result<()> {
    let local_ref = format!("refs/heads/{}", name);
    let exists = git
        .run(repo, &["rev-parse", "--verify", "--quiet", &local_ref])?
        .is_success();

    if exists {
        git.run_checked(repo, &["checkout", name])?;
    } else {
        let remote = format!("{}{}", REMOTE_PREFIX, name);
        git.run_checked(repo, &["checkout", "--track", &remote])?;
    }
    Ok(())
}

fn checkout_in(
    git: &dyn Git,
    repo: &Path,
    prefix: &str,
    picker: &mut dyn BranchPicker,
) -> Result<String> {
    let branches = matching_remote_branches(git, repo, prefix)?;
    if branches.is_empty() {
        return Err(GitUtilsError::Selection(format!(
            "no remote branches match '{}'",
            prefix
        )));
    }

    let index = picker.pick(repo, &branches)?;
    let name = branches.get(index).ok_or_else(|| {
        GitUtilsError::Selection(format!("choice {} is out of range", index + 1))
    })?;

    checkout_branch(git, repo, name)?;
    Ok(name.clone())
}

/// In every repository under `root`, pick a remote branch matching `prefix`
/// and check it out.
pub fn checkout(
    git: &dyn Git,
    root: &Path,
    prefix: &str,
    picker: &mut dyn BranchPicker,
) -> Result<WalkSummary> {
    walk(root, |repo, summary| {
        match checkout_in(git, repo, prefix, &mut *picker) {
            Ok(name) => {
                ui::display_success(&format!("{}: checked out '{}'", repo.display(), name))
            }
            Err(err) => ui::display_failure(summary.record_failure(repo, Some(prefix), err)),
        }
        Ok(())
    })
}
