use std::fmt;

use tracing::warn;

use crate::error::{GitUtilsError, Result};

/// Which component of a version to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    /// Bump the trailing component
    Increment,
    Major,
    Minor,
    Patch,
}

/// One dot-separated component, remembering whether it carried a `v` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Component {
    prefixed: bool,
    value: u64,
}

impl Component {
    /// Parse leniently: anything that is not a number becomes 0.
    fn parse(raw: &str) -> Self {
        let (prefixed, digits) = match raw.strip_prefix('v') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let value = digits.parse::<u64>().unwrap_or_else(|_| {
            warn!("non-numeric version component '{}' treated as 0", raw);
            0
        });
        Component { prefixed, value }
    }

    fn bumped(self) -> Result<Self> {
        let value = self
            .value
            .checked_add(1)
            .ok_or_else(|| GitUtilsError::version(format!("component {} overflows", self.value)))?;
        Ok(Component { value, ..self })
    }

    fn zeroed(self) -> Self {
        Component { value: 0, ..self }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefixed {
            write!(f, "v{}", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// A three-component version string such as `1.2.3` or `v1.2.3`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionString {
    components: [Component; 3],
}

impl VersionString {
    /// Parse `MAJOR.MINOR.PATCH`; exactly three components are required.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(GitUtilsError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                raw
            )));
        }

        Ok(VersionString {
            components: [
                Component::parse(parts[0]),
                Component::parse(parts[1]),
                Component::parse(parts[2]),
            ],
        })
    }

    pub fn major(&self) -> u64 {
        self.components[0].value
    }

    pub fn minor(&self) -> u64 {
        self.components[1].value
    }

    pub fn patch(&self) -> u64 {
        self.components[2].value
    }

    /// Bump version according to bump type
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let [major, minor, patch] = self.components;
        let components = match bump_type {
            VersionBump::Increment | VersionBump::Patch => [major, minor, patch.bumped()?],
            VersionBump::Major => [major.bumped()?, minor.zeroed(), patch.zeroed()],
            VersionBump::Minor => [major, minor.bumped()?, patch.zeroed()],
        };
        Ok(VersionString { components })
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch] = &self.components;
        write!(f, "{}.{}.{}", major, minor, patch)
    }
}

/// Bump the trailing component, keeping any `v` prefix.
pub fn increment(version: &str) -> Result<String> {
    bump_version(version, VersionBump::Increment)
}

/// Increment the major component and zero the rest.
pub fn bump_major(version: &str) -> Result<String> {
    bump_version(version, VersionBump::Major)
}

/// Increment the minor component and zero the patch.
pub fn bump_minor(version: &str) -> Result<String> {
    bump_version(version, VersionBump::Minor)
}

/// Increment the patch component only.
pub fn bump_patch(version: &str) -> Result<String> {
    bump_version(version, VersionBump::Patch)
}

/// Parse, bump and re-serialize a version string
pub fn bump_version(version: &str, bump_type: VersionBump) -> Result<String> {
    Ok(VersionString::parse(version)?.bump(bump_type)?.to_string())
}
