use std::fs;
use std::path::{Path, PathBuf};

use crate::bump::config::FileRule;
use crate::error::{GitUtilsError, Result};

/// Substitute both version placeholders into a search or replace pattern
fn expand(pattern: &str, current: &str, new: &str) -> String {
    pattern
        .replace("{current_version}", current)
        .replace("{new_version}", new)
}

/// A staged file rewrite: file read, new contents computed
#[derive(Debug)]
struct StagedFile {
    path: PathBuf,
    contents: String,
}

/// All file rewrites for one bump, validated before anything is written.
///
/// [RewritePlan::prepare] reads every target and applies every rule in
/// memory. Only when all rules have matched can [RewritePlan::apply] write.
#[derive(Debug)]
pub struct RewritePlan {
    files: Vec<StagedFile>,
}

impl RewritePlan {
    /// Stage every rule against its file under `root`.
    ///
    /// Rules naming the same file are applied in order to the staged
    /// contents. A missing or unreadable file, or a search pattern that does
    /// not occur, fails the whole plan with nothing written.
    pub fn prepare(root: &Path, rules: &[FileRule], current: &str, new: &str) -> Result<Self> {
        let mut files: Vec<StagedFile> = Vec::new();

        for rule in rules {
            let path = root.join(&rule.path);
            let search = expand(&rule.search, current, new);
            let replace = expand(&rule.replace, current, new);

            let index = match files.iter().position(|f| f.path == path) {
                Some(index) => index,
                None => {
                    let contents = fs::read_to_string(&path).map_err(|_| {
                        GitUtilsError::PatternNotFound {
                            path: path.clone(),
                            pattern: search.clone(),
                        }
                    })?;
                    files.push(StagedFile {
                        path: path.clone(),
                        contents,
                    });
                    files.len() - 1
                }
            };

            let staged = &mut files[index];
            if search.is_empty() || !staged.contents.contains(&search) {
                return Err(GitUtilsError::PatternNotFound {
                    path,
                    pattern: search,
                });
            }
            staged.contents = staged.contents.replace(&search, &replace);
        }

        Ok(RewritePlan { files })
    }

    /// Write every staged file, calling `on_written` after each one.
    pub fn apply<F>(self, mut on_written: F) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&Path) -> Result<()>,
    {
        let mut written = Vec::with_capacity(self.files.len());
        for file in self.files {
            fs::write(&file.path, file.contents)?;
            on_written(&file.path)?;
            written.push(file.path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(path: &str, search: &str, replace: &str) -> FileRule {
        FileRule {
            path: PathBuf::from(path),
            search: search.to_string(),
            replace: replace.to_string(),
        }
    }

    #[test]
    fn test_prepare_and_apply() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("VERSION"), "1.2.3\n").unwrap();

        let plan = RewritePlan::prepare(
            dir.path(),
            &[rule("VERSION", "{current_version}", "{new_version}")],
            "1.2.3",
            "1.2.4",
        )
        .unwrap();

        let mut seen = Vec::new();
        let written = plan
            .apply(|p| {
                seen.push(p.to_path_buf());
                Ok(())
            })
            .unwrap();

        assert_eq!(written, seen);
        assert_eq!(
            fs::read_to_string(dir.path().join("VERSION")).unwrap(),
            "1.2.4\n"
        );
    }

    #[test]
    fn test_missing_pattern_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "version: 1.2.3").unwrap();
        fs::write(dir.path().join("b.txt"), "nothing here").unwrap();

        let err = RewritePlan::prepare(
            dir.path(),
            &[
                rule("a.txt", "version: {current_version}", "version: {new_version}"),
                rule("b.txt", "version: {current_version}", "version: {new_version}"),
            ],
            "1.2.3",
            "1.2.4",
        )
        .unwrap_err();

        match err {
            GitUtilsError::PatternNotFound { path, pattern } => {
                assert_eq!(path, dir.path().join("b.txt"));
                assert_eq!(pattern, "version: 1.2.3");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "version: 1.2.3"
        );
    }

    #[test]
    fn test_missing_file_fails_plan() {
        let dir = tempfile::tempdir().unwrap();
        let result = RewritePlan::prepare(
            dir.path(),
            &[rule("gone.txt", "{current_version}", "{new_version}")],
            "1.0.0",
            "1.0.1",
        );
        assert!(matches!(
            result,
            Err(GitUtilsError::PatternNotFound { .. })
        ));
    }

    #[test]
    fn test_rules_on_same_file_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pkg.json"),
            "\"version\": \"1.0.0\",\n\"compat\": \"1.0.0\"\n",
        )
        .unwrap();

        let plan = RewritePlan::prepare(
            dir.path(),
            &[
                rule("pkg.json", "\"version\": \"{current_version}\"", "\"version\": \"{new_version}\""),
                rule("pkg.json", "\"compat\": \"{current_version}\"", "\"compat\": \"{new_version}\""),
            ],
            "1.0.0",
            "1.1.0",
        )
        .unwrap();

        let written = plan.apply(|_| Ok(())).unwrap();
        assert_eq!(written, vec![dir.path().join("pkg.json")]);
        assert_eq!(
            fs::read_to_string(dir.path().join("pkg.json")).unwrap(),
            "\"version\": \"1.1.0\",\n\"compat\": \"1.1.0\"\n"
        );
    }
}
