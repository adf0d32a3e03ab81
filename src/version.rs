use std::fmt;
use std::str::FromStr;

use crate::error::{ReleaseError, Result};

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict `X.Y.Z` version string.
    ///
    /// The pattern is anchored: no `v` prefix, no pre-release or build
    /// suffixes, exactly three dot-separated non-negative integers.
    /// Strings like `"1.2"`, `"v1.2.3"` and `"1.2.3-rc1"` are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::version(format!(
                "Invalid version '{}'. Expected SemVer: X.Y.Z",
                input
            )));
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(ReleaseError::version(format!(
                    "Invalid version '{}'. Expected SemVer: X.Y.Z",
                    input
                )));
            }
            *slot = part.parse::<u32>().map_err(|_| {
                ReleaseError::version(format!("Invalid version component '{}'", part))
            })?;
        }

        Ok(Version::new(numbers[0], numbers[1], numbers[2]))
    }

    /// Parse a version from a tag name, stripping a leading `v` if present
    /// (e.g. "v1.2.3" -> Version(1,2,3)).
    pub fn parse_tag(tag: &str) -> Result<Self> {
        Version::parse(tag.strip_prefix('v').unwrap_or(tag))
    }

    /// Bump version according to bump kind
    pub fn bump(&self, bump: &VersionBump) -> Self {
        match bump {
            VersionBump::Major => Version {
                major: self.major + 1,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: self.minor + 1,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch + 1,
            },
        }
    }

    /// Tag name for this version ("v" prefix)
    pub fn tag_name(&self) -> String {
        format!("v{}", self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl FromStr for VersionBump {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            _ => Err(ReleaseError::version(
                "BUMP must be one of: major, minor, patch",
            )),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}
