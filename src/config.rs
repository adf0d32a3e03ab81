use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};
use crate::version::{Version, VersionBump};

/// Represents the on-disk configuration for git-release.
///
/// Loaded from `gitrelease.toml`; every field has a default so the file is
/// optional. Environment variables and CLI flags take precedence over it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_changelog")]
    pub changelog: String,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_changelog() -> String {
    "CHANGELOG.md".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            branch: default_branch(),
            remote: default_remote(),
            changelog: default_changelog(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitrelease.toml").exists() {
        fs::read_to_string("./gitrelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitrelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config =
        toml::from_str(&config_str).map_err(|e| ReleaseError::config(e.to_string()))?;
    Ok(config)
}

/// Fully resolved inputs for one release run.
///
/// Built once in main from CLI flags, environment variables and the config
/// file, then threaded through the workflow. Nothing downstream reads the
/// environment again.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOptions {
    /// Branch the tool insists on running from
    pub branch: String,

    /// Remote used for push and upstream tracking
    pub remote: String,

    /// Path of the changelog file
    pub changelog_path: PathBuf,

    /// Explicit new version, bypassing bump logic entirely
    pub explicit_version: Option<Version>,

    /// Explicit bump kind; when absent the interaction provider decides
    pub bump: Option<VersionBump>,
}

impl ReleaseOptions {
    /// Resolve options from the environment on top of a loaded config.
    ///
    /// `branch_flag`, `version_flag` and `bump_flag` come from the CLI and
    /// win over the `RELEASE_BRANCH`, `VERSION` and `BUMP` environment
    /// variables, which in turn win over the config file.
    pub fn resolve(
        config: &Config,
        branch_flag: Option<&str>,
        version_flag: Option<&str>,
        bump_flag: Option<&str>,
    ) -> Result<Self> {
        let branch = branch_flag
            .map(str::to_string)
            .or_else(|| env_nonempty("RELEASE_BRANCH"))
            .unwrap_or_else(|| config.branch.clone());

        let explicit_version = match version_flag
            .map(str::to_string)
            .or_else(|| env_nonempty("VERSION"))
        {
            Some(raw) => Some(Version::parse(&raw)?),
            None => None,
        };

        let bump = match bump_flag.map(str::to_string).or_else(|| env_nonempty("BUMP")) {
            Some(raw) => Some(raw.parse::<VersionBump>()?),
            None => None,
        };

        Ok(ReleaseOptions {
            branch,
            remote: config.remote.clone(),
            changelog_path: PathBuf::from(&config.changelog),
            explicit_version,
            bump,
        })
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("RELEASE_BRANCH");
        std::env::remove_var("VERSION");
        std::env::remove_var("BUMP");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.branch, "master");
        assert_eq!(config.remote, "origin");
        assert_eq!(config.changelog, "CHANGELOG.md");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str("branch = \"main\"").unwrap();
        assert_eq!(config.branch, "main");
        assert_eq!(config.remote, "origin");
    }

    #[test]
    fn test_load_config_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitrelease.toml");
        fs::write(&path, "branch = \"release\"\nchangelog = \"NEWS.md\"\n").unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.branch, "release");
        assert_eq!(config.changelog, "NEWS.md");
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitrelease.toml");
        fs::write(&path, "branch = [not toml").unwrap();

        assert!(load_config(path.to_str()).is_err());
    }

    #[test]
    #[serial]
    fn test_resolve_defaults() {
        clear_env();
        let options = ReleaseOptions::resolve(&Config::default(), None, None, None).unwrap();
        assert_eq!(options.branch, "master");
        assert_eq!(options.remote, "origin");
        assert_eq!(options.explicit_version, None);
        assert_eq!(options.bump, None);
    }

    #[test]
    #[serial]
    fn test_resolve_env_overrides() {
        clear_env();
        std::env::set_var("RELEASE_BRANCH", "main");
        std::env::set_var("VERSION", "3.0.0");
        std::env::set_var("BUMP", "minor");

        let options = ReleaseOptions::resolve(&Config::default(), None, None, None).unwrap();
        assert_eq!(options.branch, "main");
        assert_eq!(options.explicit_version, Some(Version::new(3, 0, 0)));
        assert_eq!(options.bump, Some(VersionBump::Minor));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolve_flags_beat_env() {
        clear_env();
        std::env::set_var("RELEASE_BRANCH", "main");

        let options =
            ReleaseOptions::resolve(&Config::default(), Some("develop"), None, Some("major"))
                .unwrap();
        assert_eq!(options.branch, "develop");
        assert_eq!(options.bump, Some(VersionBump::Major));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolve_rejects_invalid_version() {
        clear_env();
        std::env::set_var("VERSION", "v1.2.3");
        let result = ReleaseOptions::resolve(&Config::default(), None, None, None);
        assert!(result.is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolve_rejects_invalid_bump() {
        clear_env();
        std::env::set_var("BUMP", "huge");
        let result = ReleaseOptions::resolve(&Config::default(), None, None, None);
        assert!(result.is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_resolve_ignores_blank_env() {
        clear_env();
        std::env::set_var("VERSION", "   ");
        let options = ReleaseOptions::resolve(&Config::default(), None, None, None).unwrap();
        assert_eq!(options.explicit_version, None);
        clear_env();
    }
}
