//! User interface module - interaction (prompts) and formatting.
//!
//! - `formatter` - formatting and printing
//! - This module - interactive branch selection

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{anyhow, Result};

use crate::error::GitUtilsError;
use crate::ops::BranchPicker;

pub mod formatter;

pub use formatter::{
    colorize_diff_stat, display_error, display_failure, display_status, display_success,
    highlight,
};

/// Prompts for one of `items` by 1-based index.
///
/// Reads a single line from `input`; anything that is not a number in
/// range is an error.
///
/// # Returns
/// The 0-based index of the chosen item
pub fn select_index<R: BufRead, W: Write>(
    items: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<usize> {
    if items.is_empty() {
        return Err(anyhow!("Nothing to choose from"));
    }

    writeln!(output, "Choose a branch:")?;
    for (i, item) in items.iter().enumerate() {
        writeln!(output, "[{}] {}", i + 1, item)?;
    }
    write!(output, "Enter your choice: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let choice = line.trim();

    match choice.parse::<usize>() {
        Ok(index) if index > 0 && index <= items.len() => Ok(index - 1),
        _ => Err(anyhow!(
            "Invalid choice '{}', expected 1-{}",
            choice,
            items.len()
        )),
    }
}

/// Picks branches by prompting on the terminal
#[derive(Debug, Default)]
pub struct StdinPicker;

impl BranchPicker for StdinPicker {
    fn pick(&mut self, repo: &Path, branches: &[String]) -> crate::Result<usize> {
        display_status(&repo.display().to_string());
        let stdin = io::stdin();
        let stdout = io::stdout();
        select_index(branches, &mut stdin.lock(), &mut stdout.lock())
            .map_err(|e| GitUtilsError::Selection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn branches() -> Vec<String> {
        vec!["feat-a".to_string(), "feat-b".to_string()]
    }

    #[test]
    fn test_select_index_is_one_based() {
        let mut input = Cursor::new("2\n");
        let mut output = Vec::new();
        let index = select_index(&branches(), &mut input, &mut output).unwrap();
        assert_eq!(index, 1);

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("[1] feat-a"));
        assert!(shown.contains("[2] feat-b"));
        assert!(shown.ends_with("Enter your choice: "));
    }

    #[test]
    fn test_select_index_rejects_out_of_range() {
        for raw in ["0\n", "3\n", "abc\n", "\n"] {
            let mut input = Cursor::new(raw);
            let mut output = Vec::new();
            assert!(select_index(&branches(), &mut input, &mut output).is_err());
        }
    }

    #[test]
    fn test_select_index_empty_list() {
        let mut input = Cursor::new("1\n");
        let mut output = Vec::new();
        assert!(select_index(&[], &mut input, &mut output).is_err());
    }
}
