use std::path::Path;
use std::process::Command;

use git2::{Repository, StatusOptions};
use tracing::debug;

use crate::error::{GitUtilsError, Result};
use crate::git::{Git, GitOutput};

/// Runs the real `git` executable
pub struct CommandGit {
    executable: String,
}

impl Default for CommandGit {
    fn default() -> Self {
        CommandGit {
            executable: "git".to_string(),
        }
    }
}

impl CommandGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom git executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        CommandGit {
            executable: executable.into(),
        }
    }

    /// Check that the executable can be launched at all
    pub fn is_available(&self) -> bool {
        Command::new(&self.executable)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }
}

impl Git for CommandGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        debug!(dir = %dir.display(), "{} {}", self.executable, args.join(" "));

        let output = Command::new(&self.executable)
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .map_err(|source| GitUtilsError::Spawn {
                command: format!("{} {}", self.executable, args.join(" ")),
                source,
            })?;

        let result = GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(code = ?result.code, "git exited");
        Ok(result)
    }

    fn is_dirty(&self, dir: &Path) -> Result<bool> {
        let repo = Repository::open(dir)?;

        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let git = CommandGit::with_executable("/nonexistent/bin/git-utils-test-git");
        assert!(!git.is_available());

        let err = git.run(Path::new("."), &["status"]).unwrap_err();
        assert!(matches!(err, GitUtilsError::Spawn { .. }));
        assert!(err.to_string().contains("Failed to launch"));
    }

    #[test]
    fn test_dirty_check_outside_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = CommandGit::new().is_dirty(dir.path());
        assert!(matches!(result, Err(GitUtilsError::Git(_))));
    }
}
