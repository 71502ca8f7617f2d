use crate::error::{GitUtilsError, Result};

/// Owner and repository name parsed from a remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSlug {
    pub owner: String,
    pub name: String,
}

impl RemoteSlug {
    /// Parse an origin URL.
    ///
    /// Two shapes are understood:
    /// - scp-like SSH, `git@github.com:alice/repo.git` (two slash-separated segments)
    /// - URL form, `https://github.com/alice/repo.git` (five slash-separated segments)
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        let parts: Vec<&str> = url.split('/').collect();

        let owner = match parts.len() {
            2 => {
                let (_, owner) = parts[0]
                    .split_once(':')
                    .ok_or_else(|| GitUtilsError::remote_url(url))?;
                owner
            }
            5 => parts[3],
            _ => return Err(GitUtilsError::remote_url(url)),
        };

        let name = parts[parts.len() - 1].trim_end_matches(".git");
        if owner.is_empty() || name.is_empty() {
            return Err(GitUtilsError::remote_url(url));
        }

        Ok(RemoteSlug {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}
