use std::fmt;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::warn;

use crate::error::Result;
use crate::git::Git;

const LOG_FORMAT: &str = "--pretty=format:%h|%an|%ad|%s";
const DATE_FORMAT: &str = "--date=format:%Y-%m-%d %H:%M";

/// One commit in the standup digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDigest {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub subject: String,
}

impl fmt::Display for CommitDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({}) <{}>",
            self.hash, self.subject, self.date, self.author
        )
    }
}

/// The most recent working day before `today`.
///
/// Monday and the weekend look back to Friday; any other day to yesterday.
pub fn last_working_day(today: NaiveDate) -> NaiveDate {
    let days_back = match today.weekday() {
        Weekday::Mon => 3,
        Weekday::Sun => 2,
        _ => 1,
    };
    today - Duration::days(days_back)
}

/// Parse `hash|author|date|subject` lines; the subject may contain pipes
pub fn parse_log(stdout: &str) -> Vec<CommitDigest> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut parts = line.splitn(4, '|');
            Some(CommitDigest {
                hash: parts.next()?.trim().to_string(),
                author: parts.next()?.trim().to_string(),
                date: parts.next()?.trim().to_string(),
                subject: parts.next()?.trim().to_string(),
            })
        })
        .collect()
}

/// Commits in `dir` since `since`, after refreshing every remote.
///
/// A failed fetch is logged and the local history is used.
pub fn standup(git: &dyn Git, dir: &Path, since: NaiveDate) -> Result<Vec<CommitDigest>> {
    let fetched = git.run(dir, &["fetch", "--all"])?;
    if !fetched.is_success() {
        warn!(
            "fetch failed in {}, showing local history: {}",
            dir.display(),
            fetched.combined().trim()
        );
    }

    let since_arg = format!("--since={}", since.format("%Y-%m-%d"));
    let stdout = git.run_checked(dir, &["log", &since_arg, DATE_FORMAT, LOG_FORMAT])?;
    Ok(parse_log(&stdout))
}
