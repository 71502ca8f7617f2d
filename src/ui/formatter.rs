//! Pure formatting functions for UI output.
//!
//! Functions returning `String` do no I/O and are tested directly; the
//! `display_*` family prints.

use console::style;

use crate::report::RepoFailure;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a non-fatal per-repository failure.
pub fn display_failure(failure: &RepoFailure) {
    eprintln!("{} {}", style("⚠").yellow(), failure);
}

/// Color a `git diff --stat` block: file names cyan, `+` green, `-` red.
pub fn colorize_diff_stat(stat: &str) -> String {
    stat.lines()
        .map(|line| match line.split_once('|') {
            Some((file, graph)) => {
                let graph: String = graph
                    .chars()
                    .map(|c| match c {
                        '+' => style(c).green().to_string(),
                        '-' => style(c).red().to_string(),
                        _ => c.to_string(),
                    })
                    .collect();
                format!("{}|{}", style(file).cyan(), graph)
            }
            None => style(line).bold().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Highlight every occurrence of `pattern` in `line` in bold red.
pub fn highlight(line: &str, pattern: &str) -> String {
    if pattern.is_empty() {
        return line.to_string();
    }
    line.split(pattern)
        .collect::<Vec<_>>()
        .join(&style(pattern).red().bold().to_string())
}
