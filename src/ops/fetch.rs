use std::path::Path;

use crate::error::Result;
use crate::git::Git;
use crate::ops::{walk, BranchTarget};
use crate::report::WalkSummary;
use crate::ui;

fn fetch_one(
    git: &dyn Git,
    repo: &Path,
    branch: Option<&str>,
    args: &[&str],
    summary: &mut WalkSummary,
) {
    let label = branch.unwrap_or("all remotes");
    match git.run_checked(repo, args) {
        Ok(_) => ui::display_success(&format!("{}: fetched {}", repo.display(), label)),
        Err(err) => ui::display_failure(summary.record_failure(repo, branch, err)),
    }
}

/// Fetch `target` in every repository under `root`.
///
/// A failing branch is reported and the remaining branches and
/// repositories are still fetched.
pub fn fetch(git: &dyn Git, root: &Path, target: &BranchTarget) -> Result<WalkSummary> {
    walk(root, |repo, summary| {
        match target {
            BranchTarget::All => fetch_one(git, repo, None, &["fetch", "--all"], summary),
            BranchTarget::Branches(branches) => {
                for branch in branches {
                    fetch_one(
                        git,
                        repo,
                        Some(branch.as_str()),
                        &["fetch", "origin", branch.as_str()],
                        summary,
                    );
                }
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{GitOutput, MockGit};
    use std::fs;

    #[test]
    fn test_fetch_all_uses_fetch_all() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("repo/.git")).unwrap();

        let git = MockGit::new();
        let summary = fetch(&git, dir.path(), &BranchTarget::All).unwrap();

        assert!(summary.is_clean());
        assert!(git.invoked(&["fetch", "--all"]));
        assert_eq!(git.calls()[0].dir, dir.path().join("repo"));
    }

    #[test]
    fn test_failing_branch_does_not_stop_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("repo/.git")).unwrap();

        let git = MockGit::new().with_response(
            &["fetch", "origin", "gone"],
            GitOutput::failure(128, "fatal: couldn't find remote ref gone"),
        );
        let target = BranchTarget::parse("gone,main").unwrap();
        let summary = fetch(&git, dir.path(), &target).unwrap();

        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].branch.as_deref(), Some("gone"));
        assert!(git.invoked(&["fetch", "origin", "main"]));
    }
}
