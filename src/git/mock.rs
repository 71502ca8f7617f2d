use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::git::{Git, GitOutput};

/// A single recorded git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub dir: PathBuf,
    pub args: Vec<String>,
}

/// Scripted git for testing without spawning processes.
///
/// Responses are matched on the exact argument list; anything unscripted
/// succeeds with empty output.
pub struct MockGit {
    responses: Vec<(Vec<String>, GitOutput)>,
    calls: RefCell<Vec<RecordedCall>>,
    dirty: Cell<bool>,
}

impl MockGit {
    /// Create a new mock with no scripted responses and a clean tree
    pub fn new() -> Self {
        MockGit {
            responses: Vec::new(),
            calls: RefCell::new(Vec::new()),
            dirty: Cell::new(false),
        }
    }

    /// Script the output for an exact argument list
    pub fn with_response(mut self, args: &[&str], output: GitOutput) -> Self {
        self.responses
            .push((args.iter().map(|a| a.to_string()).collect(), output));
        self
    }

    /// Report every working tree as dirty (or clean)
    pub fn set_dirty(&self, dirty: bool) {
        self.dirty.set(dirty);
    }

    /// All invocations so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Whether git was ever invoked with exactly `args`
    pub fn invoked(&self, args: &[&str]) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|call| call.args.iter().map(String::as_str).eq(args.iter().copied()))
    }

    /// Whether any invocation's first argument was `subcommand`
    pub fn invoked_subcommand(&self, subcommand: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|call| call.args.first().map(String::as_str) == Some(subcommand))
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

impl Git for MockGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        self.calls.borrow_mut().push(RecordedCall {
            dir: dir.to_path_buf(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        let scripted = self.responses.iter().find(|(expected, _)| {
            expected.iter().map(String::as_str).eq(args.iter().copied())
        });

        Ok(scripted
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| GitOutput::success("")))
    }

    fn is_dirty(&self, _dir: &Path) -> Result<bool> {
        Ok(self.dirty.get())
    }
}
