//! Annotated tags with messages rendered from configured templates.

use std::path::Path;

use tracing::debug;

use crate::config::AppConfig;
use crate::domain::{RemoteSlug, TemplateVars};
use crate::error::{GitUtilsError, Result};
use crate::git::Git;

/// Input for a templated tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRequest {
    pub tag_name: String,
    /// Key into `tags.messages`
    pub message_key: String,
}

impl TagRequest {
    pub fn new(tag_name: impl Into<String>, message_key: impl Into<String>) -> Self {
        TagRequest {
            tag_name: tag_name.into(),
            message_key: message_key.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.tag_name.trim().is_empty() && !self.message_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// Tag name or message key was missing; the caller shows usage
    MissingInput,
    Created { tag: String, message: String },
}

/// Most recent annotated tag whose name has no hyphen, or "" when none exists
pub fn previous_tag(git: &dyn Git, dir: &Path) -> Result<String> {
    let output = git.run(dir, &["describe", "--abbrev=0", "--exclude=*-*"])?;
    if !output.is_success() {
        debug!("no previous tag: {}", output.combined().trim());
        return Ok(String::new());
    }
    Ok(output.stdout.trim().to_string())
}

/// Owner and name of the `origin` remote
pub fn origin_slug(git: &dyn Git, dir: &Path) -> Result<RemoteSlug> {
    let url = git.run_checked(dir, &["config", "--get", "remote.origin.url"])?;
    RemoteSlug::parse(&url)
}

/// The variables available to tag message templates
pub fn template_vars(git: &dyn Git, dir: &Path, new_tag: &str) -> Result<TemplateVars> {
    let prev_tag = previous_tag(git, dir)?;
    let slug = origin_slug(git, dir)?;
    Ok(TemplateVars::new()
        .with("repo_owner", slug.owner)
        .with("repo_name", slug.name)
        .with("prevTag", prev_tag)
        .with("newTag", new_tag))
}

/// Create an annotated tag in `dir` whose message comes from a named template.
pub fn create_tag(
    git: &dyn Git,
    dir: &Path,
    config: &AppConfig,
    config_path: &Path,
    request: &TagRequest,
) -> Result<TagOutcome> {
    if !request.is_complete() {
        return Ok(TagOutcome::MissingInput);
    }

    let template = config.tag_message(&request.message_key).ok_or_else(|| {
        GitUtilsError::config(format!(
            "no tag message named '{}'. Add it under tags.messages in {} (run: git-utils --config)",
            request.message_key,
            config_path.display()
        ))
    })?;

    let vars = template_vars(git, dir, &request.tag_name)?;
    let message = vars.render(template);

    git.run_checked(dir, &["tag", &request.tag_name, "-a", "-m", &message])
        .map_err(|e| GitUtilsError::tag(format!("failed to create '{}': {}", request.tag_name, e)))?;

    Ok(TagOutcome::Created {
        tag: request.tag_name.clone(),
        message,
    })
}
