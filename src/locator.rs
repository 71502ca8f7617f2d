//! Discovery of git working trees under a root directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, FilterEntry, IntoIter, WalkDir};

use crate::error::{GitUtilsError, Result};

const GIT_DIR: &str = ".git";

/// Whether `path` has an immediate `.git` entry (directory or gitfile)
pub fn is_git_repository(path: &Path) -> bool {
    fs::metadata(path.join(GIT_DIR)).is_ok()
}

fn outside_git_metadata(entry: &DirEntry) -> bool {
    entry.file_name() != GIT_DIR
}

/// Lazy iterator over the working trees below a root.
///
/// Never enters a `.git` directory, but does descend into working trees so
/// nested repositories are found. Entries that cannot be read are skipped.
pub struct RepositoryWalker {
    inner: FilterEntry<IntoIter, fn(&DirEntry) -> bool>,
}

impl Iterator for RepositoryWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if entry.file_type().is_dir() && is_git_repository(entry.path()) {
                        return Some(entry.into_path());
                    }
                }
                Err(err) => {
                    debug!("skipping unreadable entry: {}", err);
                }
            }
        }
    }
}

/// Entries below `root` in file-name order, never entering `.git`.
///
/// Symlinks are not followed. A missing root, or a root that is not a
/// directory, is [GitUtilsError::DirectoryNotFound].
pub fn entries_outside_git(root: &Path) -> Result<FilterEntry<IntoIter, fn(&DirEntry) -> bool>> {
    let metadata = fs::metadata(root).map_err(|err| match err.kind() {
        ErrorKind::NotFound => GitUtilsError::DirectoryNotFound(root.to_path_buf()),
        _ => GitUtilsError::Io(err),
    })?;
    if !metadata.is_dir() {
        return Err(GitUtilsError::DirectoryNotFound(root.to_path_buf()));
    }

    let filter: fn(&DirEntry) -> bool = outside_git_metadata;
    Ok(WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(filter))
}

/// Walk `root` and yield every directory that is a git working tree.
///
/// The root itself is yielded first when it is a repository. An
/// inaccessible root is an error; anything unreadable below it is skipped.
pub fn locate_repositories(root: &Path) -> Result<RepositoryWalker> {
    Ok(RepositoryWalker {
        inner: entries_outside_git(root)?,
    })
}
