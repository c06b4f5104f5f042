#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Run configuration for gh2npm
//!
//! This crate handles loading and merging configuration from:
//! - The JSON configuration file describing the target repository/package
//! - Environment variables (`GITHUB_TOKEN`)
//! - CLI flags (tag selection, publish mode)
//!
//! A `RunConfig` is constructed once before any pipeline activity and
//! never mutated during a run.

use gh2npm_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

pub mod constants;

/// Immutable per-run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunConfig {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Package name; also the payload prefix matched inside archives
    pub name: String,

    /// SPDX license identifier forwarded to the releaser
    pub license: String,

    /// Homepage URL forwarded to the releaser
    pub homepage: String,

    /// Omit the package-name prefix on the primary package
    #[serde(default)]
    pub no_prefix_for_main_package: bool,

    /// Staging directory, wiped and recreated per release
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Path of the external packaging executable
    #[serde(default = "default_releaser_path")]
    pub releaser_path: PathBuf,

    /// Process only the release with this tag (run-time override)
    #[serde(skip)]
    pub tag: Option<String>,

    /// Pass `--publish` to the releaser; otherwise this is a dry run
    #[serde(skip)]
    pub publish: bool,
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from(constants::DEFAULT_STAGING_DIR)
}

fn default_releaser_path() -> PathBuf {
    PathBuf::from(constants::DEFAULT_RELEASER_PATH)
}

impl RunConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file cannot be read and
    /// `ConfigError::ParseError` if it is not valid JSON for this schema.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Validate that all required fields are present and non-empty
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` naming the first empty field.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("Owner", &self.owner),
            ("Repo", &self.repo),
            ("Name", &self.name),
            ("License", &self.license),
            ("Homepage", &self.homepage),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Read the optional GitHub API token from the environment
    #[must_use]
    pub fn github_token() -> Option<String> {
        std::env::var(constants::GITHUB_TOKEN_VAR)
            .ok()
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "Owner": "lotabout",
            "Repo": "skim",
            "Name": "sk",
            "License": "MIT",
            "Homepage": "https://github.com/lotabout/skim"
        }"#
    }

    #[tokio::test]
    async fn test_load_sample_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, sample_json()).await.unwrap();

        let config = RunConfig::load(&path).await.unwrap();
        assert_eq!(config.owner, "lotabout");
        assert_eq!(config.repo, "skim");
        assert_eq!(config.name, "sk");
        assert!(!config.no_prefix_for_main_package);
        assert_eq!(
            config.staging_dir,
            PathBuf::from(constants::DEFAULT_STAGING_DIR)
        );
        assert_eq!(
            config.releaser_path,
            PathBuf::from(constants::DEFAULT_RELEASER_PATH)
        );
        assert!(config.tag.is_none());
        assert!(!config.publish);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::load(&dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(gh2npm_errors::ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = RunConfig::load(&path).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(gh2npm_errors::ConfigError::ParseError { .. })
        ));
    }

    #[tokio::test]
    async fn test_validate_rejects_empty_required_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(
            &path,
            r#"{"Owner": "", "Repo": "r", "Name": "n", "License": "MIT", "Homepage": "h"}"#,
        )
        .await
        .unwrap();

        let config = RunConfig::load(&path).await.unwrap();
        let err = config.validate().unwrap_err();
        match err {
            Error::Config(gh2npm_errors::ConfigError::MissingField { field }) => {
                assert_eq!(field, "Owner");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_optional_fields_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(
            &path,
            r#"{
                "Owner": "o", "Repo": "r", "Name": "n",
                "License": "MIT", "Homepage": "h",
                "NoPrefixForMainPackage": true,
                "StagingDir": "/tmp/stage",
                "ReleaserPath": "/usr/local/bin/npm-binary-releaser"
            }"#,
        )
        .await
        .unwrap();

        let config = RunConfig::load(&path).await.unwrap();
        assert!(config.no_prefix_for_main_package);
        assert_eq!(config.staging_dir, PathBuf::from("/tmp/stage"));
        assert_eq!(
            config.releaser_path,
            PathBuf::from("/usr/local/bin/npm-binary-releaser")
        );
    }
}
