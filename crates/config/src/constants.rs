//! Centralized defaults and fixed names for the release pipeline
//!
//! The checksum manifest name and the package-name prefix are part of the
//! releaser's contract and deliberately not configurable.

/// Release asset that is never downloaded or staged
pub const CHECKSUM_MANIFEST: &str = "checksums.txt";

/// Prefix passed to the releaser for secondary per-platform packages
pub const PACKAGE_NAME_PREFIX: &str = "@install-binary/";

/// Default staging directory, recreated per release
pub const DEFAULT_STAGING_DIR: &str = "./bin";

/// Default path of the external packaging executable
pub const DEFAULT_RELEASER_PATH: &str = "./npm-binary-releaser";

/// Environment variable holding an optional GitHub API token
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
