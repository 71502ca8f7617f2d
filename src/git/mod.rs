//! Git command execution layer
//!
//! Every git interaction in git-utils goes through the [Git] trait, so the
//! operators can run against the real `git` executable or against a scripted
//! fake in tests.
//!
//! - [command::CommandGit]: spawns `git -C <dir> ...` and reads libgit2 for the dirty-check
//! - [mock::MockGit]: records calls and returns canned outputs
//!
//! A non-zero exit status is not an error at this layer. [Git::run] hands back
//! a [GitOutput] and the caller decides what the exit code means; use
//! [Git::run_checked] when any failure should become a [GitUtilsError::Command].

pub mod command;
pub mod mock;

pub use command::CommandGit;
pub use mock::MockGit;

use std::path::Path;

use crate::error::{GitUtilsError, Result};

/// Captured result of a single git invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GitOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// A successful invocation with the given stdout
    pub fn success(stdout: impl Into<String>) -> Self {
        GitOutput {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed invocation with the given exit code and stderr
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        GitOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, the way a terminal would show them
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Abstraction over the version-control executable
pub trait Git {
    /// Run git with `args` in `dir` and capture its output.
    ///
    /// Only a failure to spawn the process is an `Err`; a non-zero exit is
    /// reported through [GitOutput::code].
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput>;

    /// Whether tracked files in `dir` have staged or unstaged modifications.
    ///
    /// Untracked files do not make a tree dirty.
    fn is_dirty(&self, dir: &Path) -> Result<bool>;

    /// Run git and turn a non-zero exit into [GitUtilsError::Command].
    ///
    /// Returns the trimmed stdout on success.
    fn run_checked(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = self.run(dir, args)?;
        if !output.is_success() {
            return Err(GitUtilsError::Command {
                command: format!("git {}", args.join(" ")),
                code: output.code.unwrap_or(-1),
                output: output.combined().trim().to_string(),
            });
        }
        Ok(output.stdout.trim().to_string())
    }
}

/// Non-empty trimmed lines of git output
pub fn output_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_output() {
        let mut out = GitOutput::success("Already up to date.\n");
        assert_eq!(out.combined(), "Already up to date.\n");

        out.stderr = "warning: something".to_string();
        assert_eq!(out.combined(), "Already up to date.\nwarning: something");

        let err = GitOutput::failure(1, "fatal: bad");
        assert_eq!(err.combined(), "fatal: bad");
        assert!(!err.is_success());
    }

    #[test]
    fn test_run_checked_maps_failure() {
        let git = MockGit::new().with_response(
            &["fetch", "origin", "nope"],
            GitOutput::failure(128, "fatal: couldn't find remote ref nope"),
        );

        let err = git
            .run_checked(Path::new("/repo"), &["fetch", "origin", "nope"])
            .unwrap_err();
        match err {
            GitUtilsError::Command {
                command,
                code,
                output,
            } => {
                assert_eq!(command, "git fetch origin nope");
                assert_eq!(code, 128);
                assert!(output.contains("couldn't find remote ref"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_output_lines_skips_blanks() {
        let lines = output_lines("  main\n\n  develop  \n");
        assert_eq!(lines, vec!["main".to_string(), "develop".to_string()]);
    }
}
