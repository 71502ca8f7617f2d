use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GitUtilsError, Result};
use crate::locator::entries_outside_git;
use crate::ui;

/// Default longest line, in bytes
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepOptions {
    /// Fixed string to search for
    pub pattern: String,
    /// Longest line a file may contain, in bytes
    pub buffer: usize,
}

impl GrepOptions {
    pub fn new(pattern: impl Into<String>) -> Self {
        GrepOptions {
            pattern: pattern.into(),
            buffer: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// One matching line, path relative to the search root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepMatch {
    pub path: PathBuf,
    pub line: usize,
    pub text: String,
}

/// What scanning a single file produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileScan {
    /// 1-based line numbers and texts of the matching lines
    Lines(Vec<(usize, String)>),
    /// A NUL byte was seen; the file is not searched
    Binary,
    /// A line is longer than the buffer
    LineTooLong,
}

/// Scan `reader` line by line for the fixed pattern.
///
/// Lines end at `\n` with an optional `\r`. No line may exceed
/// `options.buffer` bytes, and at most that much is held in memory per line.
pub fn scan_lines<R: BufRead>(mut reader: R, options: &GrepOptions) -> io::Result<FileScan> {
    let limit = options.buffer as u64 + 1;
    let mut hits = Vec::new();
    let mut raw = Vec::new();
    let mut number = 0;

    loop {
        raw.clear();
        let read = (&mut reader).take(limit).read_until(b'\n', &mut raw)?;
        if read == 0 {
            break;
        }
        number += 1;

        if raw.last() == Some(&b'\n') {
            raw.pop();
        } else if read as u64 == limit {
            return Ok(FileScan::LineTooLong);
        }
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        if raw.contains(&0) {
            return Ok(FileScan::Binary);
        }

        let text = String::from_utf8_lossy(&raw);
        if text.contains(options.pattern.as_str()) {
            hits.push((number, text.into_owned()));
        }
    }
    Ok(FileScan::Lines(hits))
}

/// Search one file; `shown` is the path reported with each match.
pub fn grep_file(path: &Path, shown: &Path, options: &GrepOptions) -> Result<Vec<GrepMatch>> {
    let file = File::open(path)?;
    match scan_lines(BufReader::new(file), options)? {
        FileScan::Lines(lines) => Ok(lines
            .into_iter()
            .map(|(line, text)| GrepMatch {
                path: shown.to_path_buf(),
                line,
                text,
            })
            .collect()),
        FileScan::Binary => {
            debug!("skipping binary file {}", path.display());
            Ok(Vec::new())
        }
        FileScan::LineTooLong => Err(GitUtilsError::BufferTooSmall {
            path: path.to_path_buf(),
            size: options.buffer,
        }),
    }
}

/// Result of a grep walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrepReport {
    pub matches: usize,
    /// Files that were opened and scanned
    pub files: usize,
}

fn print_match(hit: &GrepMatch, pattern: &str) {
    println!(
        "\n{}\nL{}: {}",
        hit.path.display(),
        hit.line,
        ui::highlight(&hit.text, pattern)
    );
}

/// Search every file under `root` for a fixed string.
///
/// Everything outside `.git` is searched, tracked or not, whether or not it
/// sits in a repository. Binary files and unreadable entries are skipped.
/// A line longer than the buffer ends the search with
/// [GitUtilsError::BufferTooSmall].
pub fn grep(root: &Path, options: &GrepOptions) -> Result<GrepReport> {
    let mut report = GrepReport::default();

    for entry in entries_outside_git(root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let shown = path.strip_prefix(root).unwrap_or(path);
        match grep_file(path, shown, options) {
            Ok(hits) => {
                report.files += 1;
                for hit in &hits {
                    print_match(hit, &options.pattern);
                }
                report.matches += hits.len();
            }
            Err(err @ GitUtilsError::BufferTooSmall { .. }) => return Err(err),
            Err(err) => warn!("skipping {}: {}", path.display(), err),
        }
    }

    if report.matches == 0 {
        println!("No matches found.");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scan(contents: &str, pattern: &str, buffer: usize) -> FileScan {
        let options = GrepOptions {
            pattern: pattern.to_string(),
            buffer,
        };
        scan_lines(Cursor::new(contents.as_bytes().to_vec()), &options).unwrap()
    }

    #[test]
    fn test_scan_reports_one_based_lines() {
        assert_eq!(
            scan("alpha\nneedle one\nbeta\r\nneedle two", "needle", 64),
            FileScan::Lines(vec![
                (2, "needle one".to_string()),
                (4, "needle two".to_string())
            ])
        );
    }

    #[test]
    fn test_scan_strips_carriage_return() {
        assert_eq!(
            scan("a needle\r\n", "needle", 64),
            FileScan::Lines(vec![(1, "a needle".to_string())])
        );
    }

    #[test]
    fn test_scan_no_match() {
        assert_eq!(scan("nothing here\n", "needle", 64), FileScan::Lines(Vec::new()));
        assert_eq!(scan("", "needle", 64), FileScan::Lines(Vec::new()));
    }

    #[test]
    fn test_buffer_limit_applies_to_every_line() {
        // the long line does not match, it still overflows
        let contents = format!("needle\n{}\n", "x".repeat(40));
        assert_eq!(scan(&contents, "needle", 16), FileScan::LineTooLong);
    }

    #[test]
    fn test_line_of_exactly_buffer_size_fits() {
        let contents = format!("{}\n{}", "n".repeat(16), "n".repeat(16));
        match scan(&contents, "n", 16) {
            FileScan::Lines(lines) => assert_eq!(lines.len(), 2),
            other => panic!("unexpected scan: {other:?}"),
        }
        assert_eq!(scan(&"n".repeat(17), "n", 16), FileScan::LineTooLong);
    }

    #[test]
    fn test_nul_byte_marks_binary() {
        assert_eq!(scan("needle\0bytes\n", "needle", 64), FileScan::Binary);
    }

    #[test]
    fn test_grep_file_overflow_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("min.js");
        std::fs::write(&path, "x".repeat(64)).unwrap();

        let options = GrepOptions {
            pattern: "y".to_string(),
            buffer: 16,
        };
        match grep_file(&path, Path::new("min.js"), &options).unwrap_err() {
            GitUtilsError::BufferTooSmall { path: reported, size } => {
                assert_eq!(reported, path);
                assert_eq!(size, 16);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
