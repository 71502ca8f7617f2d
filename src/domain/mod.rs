//! Domain logic - pure rules independent of git and the filesystem

pub mod remote;
pub mod template;
pub mod version;

pub use remote::RemoteSlug;
pub use template::TemplateVars;
pub use version::{VersionBump, VersionString};
