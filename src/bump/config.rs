use std::fs;
use std::path::{Path, PathBuf};

use ini::{EscapePolicy, Ini, ParseOption};

use crate::error::{GitUtilsError, Result};

/// Name of the bump configuration file at the repository root
pub const BUMP_CONFIG_FILE: &str = ".git-utils-bump.cfg";

const MAIN_SECTION: &str = "bumpversion";
const FILE_SECTION_PREFIXES: [&str; 2] = ["bumpversion:file:", "file:"];

/// One file whose version string is rewritten on bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRule {
    /// Path as written in the config, relative to the config's directory
    pub path: PathBuf,
    pub search: String,
    pub replace: String,
}

/// Parsed `.git-utils-bump.cfg`.
///
/// The underlying INI document is kept so unrelated keys survive a save.
#[derive(Debug, Clone)]
pub struct BumpConfig {
    path: PathBuf,
    document: Ini,
    pub current_version: String,
    pub commit: bool,
    pub tag: bool,
    pub tag_format: String,
    pub files: Vec<FileRule>,
}

/// Parses an INI boolean the lenient way: 1/0, t/f, true/false, y/n, yes/no, on/off.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Values are read verbatim; quotes are dropped only when they wrap the
/// whole value and do not occur inside it.
fn unquote(raw: &str) -> &str {
    let value = raw.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            if !inner.contains(quote) {
                return inner;
            }
        }
    }
    value
}

fn main_value<'a>(document: &'a Ini, key: &str) -> Option<&'a str> {
    document.get_from(Some(MAIN_SECTION), key).map(unquote)
}

fn read_bool(document: &Ini, key: &str) -> Result<bool> {
    match main_value(document, key) {
        None => Ok(false),
        Some(raw) if raw.trim().is_empty() => Ok(false),
        Some(raw) => parse_bool(raw).ok_or_else(|| {
            GitUtilsError::config(format!("'{}' must be a boolean, got '{}'", key, raw))
        }),
    }
}

impl BumpConfig {
    /// Loads and validates the bump configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GitUtilsError::config(format!(
                "bump config '{}' not found",
                path.display()
            )));
        }
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let document = Ini::load_from_file_opt(path, options)?;
        Self::from_document(path, document)
    }

    fn from_document(path: &Path, document: Ini) -> Result<Self> {
        let current_version = main_value(&document, "current_version")
            .map(str::to_string)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                GitUtilsError::config(format!(
                    "[{}] current_version missing in '{}'",
                    MAIN_SECTION,
                    path.display()
                ))
            })?;

        let commit = read_bool(&document, "commit")?;
        let tag = read_bool(&document, "tag")?;
        let tag_format = main_value(&document, "tag_format")
            .filter(|v| !v.is_empty())
            .unwrap_or("{tag}")
            .to_string();

        let mut files = Vec::new();
        for (section, properties) in document.iter() {
            let Some(name) = section else { continue };
            let Some(file) = FILE_SECTION_PREFIXES
                .iter()
                .find_map(|prefix| name.strip_prefix(prefix))
            else {
                continue;
            };
            files.push(FileRule {
                path: PathBuf::from(file.trim()),
                search: properties
                    .get("search")
                    .map(unquote)
                    .unwrap_or("{current_version}")
                    .to_string(),
                replace: properties
                    .get("replace")
                    .map(unquote)
                    .unwrap_or("{new_version}")
                    .to_string(),
            });
        }

        Ok(BumpConfig {
            path: path.to_path_buf(),
            document,
            current_version,
            commit,
            tag,
            tag_format,
            files,
        })
    }

    /// Location the config was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory file rules are resolved against
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Tag name for `version` according to `tag_format`
    pub fn tag_name(&self, version: &str) -> String {
        self.tag_format
            .replace("{tag}", version)
            .replace("{new_version}", version)
    }

    /// Persists `current_version` with a temp-file-and-rename write.
    pub fn save(&mut self) -> Result<()> {
        self.document
            .with_section(Some(MAIN_SECTION))
            .set("current_version", self.current_version.clone());

        let tmp = self.path.with_extension("cfg.tmp");
        self.document.write_to_file_policy(&tmp, EscapePolicy::Nothing)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
